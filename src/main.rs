//! minicurl
//!
//! Fetches one URL and prints its body decoded with the charset declared in
//! the response.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ cli ──▶ RequestConfig ──▶ http::Launcher ──▶ transport (curl)   
//!                                           │                   │
//!                                           │   header lines    │
//!                                           │◀──────────────────┤
//!                                           │   body chunks     │
//!                                           │◀──────────────────┘
//!                                           ▼
//!                             HeaderStore + body buffer
//!                                           │
//!                                           ▼
//!                                    ResponseDecoder ──▶ stdout
//! ```
//!
//! Settings (user agent, optional timeout, log level) come from an optional
//! TOML file given with `--config`. Logs go to stderr.

use std::io;

use clap::Parser;

use minicurl::cli::{self, Cli};
use minicurl::http::HttpTransport;
use minicurl::observability::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            let _ = cli::report_error(&mut out, &e);
            return;
        }
    };

    init_logging(&settings.observability);

    tracing::debug!(
        backend = ?settings.transport.backend,
        user_agent = %settings.transport.user_agent,
        timeout_secs = ?settings.transport.timeout_secs,
        "Settings loaded"
    );

    let transport = match HttpTransport::from_config(&settings.transport) {
        Ok(transport) => transport,
        Err(e) => {
            let _ = cli::report_error(&mut out, &e);
            return;
        }
    };

    if let Err(e) = cli::execute(&cli.args, &settings, &transport, &mut out).await {
        tracing::error!(error = %e, "Failed to write output");
    }
}
