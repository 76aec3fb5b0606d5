//! Command-line surface.
//!
//! # Data Flow
//! ```text
//! argv
//!     → Cli (clap: --config, then every remaining token verbatim)
//!     → args.rs (prefix-matched flags → RequestConfig)
//!     → http::Launcher (exactly one launch)
//!     → on any error: "error occurred: ..." + usage, never a crash
//! ```

pub mod args;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::config::{load_config, Settings};
use crate::error::FetchError;
use crate::http::{LaunchOutcome, Launcher, Transport};

pub use args::parse_args;

pub const USAGE: [&str; 2] = [
    "minicurl <web-url> [-X POST] [--hide-result] [--show-header] [-v]",
    "ex) minicurl www.google.com -X POST --hide-result --show-header",
];

#[derive(Parser, Debug)]
#[command(name = "minicurl")]
#[command(version, about = "Fetch a URL and print its body decoded by the declared charset", long_about = None)]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// <web-url> [-X POST] [--hide-result] [--show-header] [-v]
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Cli {
    /// Settings from `--config`, or the defaults when none was given.
    pub fn settings(&self) -> Result<Settings, FetchError> {
        match &self.config {
            Some(path) => Ok(load_config(path)?),
            None => Ok(Settings::default()),
        }
    }
}

pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    for line in USAGE {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Print the error block: the message followed by the usage example.
pub fn report_error<W: Write>(out: &mut W, err: &FetchError) -> io::Result<()> {
    writeln!(out, "error occurred: {}", err)?;
    write_usage(out)
}

/// Parse `tokens`, launch once, and report any failure on `out`.
///
/// Returns the outcome of the launch, or `None` if an error block was
/// printed instead. Only failures to write to `out` escape.
pub async fn execute<T: Transport, W: Write>(
    tokens: &[String],
    settings: &Settings,
    transport: &T,
    mut out: W,
) -> io::Result<Option<LaunchOutcome>> {
    match fetch(tokens, settings, transport, &mut out).await {
        Ok(outcome) => Ok(Some(outcome)),
        Err(e) => {
            tracing::warn!(error = %e, "Fetch failed");
            report_error(&mut out, &e)?;
            Ok(None)
        }
    }
}

async fn fetch<T: Transport, W: Write>(
    tokens: &[String],
    settings: &Settings,
    transport: &T,
    out: W,
) -> Result<LaunchOutcome, FetchError> {
    let config = parse_args(tokens, &settings.transport.default_scheme)?;
    tracing::debug!(?config, "Arguments parsed");

    Launcher::new(transport, out).launch(&config).await
}
