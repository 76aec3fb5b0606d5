//! Configuration schema definitions.
//!
//! [`Settings`] is read from an optional TOML file and covers the knobs that
//! stay the same between invocations. [`RequestConfig`] is built from the
//! command line and describes exactly one launch.

use serde::Deserialize;

/// Root of the settings file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// HTTP transport settings.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Which HTTP client performs the round trip.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportBackend {
    /// libcurl: raw header lines exactly as received, names in original case.
    #[default]
    Curl,
    /// reqwest: pure Rust, but header names arrive lowercased.
    Reqwest,
}

/// Settings for the HTTP transport.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransportConfig {
    /// HTTP client to use.
    pub backend: TransportBackend,

    /// `User-Agent` sent with the request.
    pub user_agent: String,

    /// Bound on the whole round trip in seconds. Unset means wait forever.
    pub timeout_secs: Option<u64>,

    /// Scheme prepended to URLs given without one (e.g. `www.google.com`).
    pub default_scheme: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            backend: TransportBackend::Curl,
            user_agent: concat!("minicurl/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            default_scheme: "http".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Everything one launch needs to know, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// Target URL, already normalized to carry a scheme.
    pub url: String,

    /// Lowercased verb given with `-X`. Stored only; the transport always
    /// issues the same request regardless of it.
    pub method: Option<String>,

    /// Print which encoding was used to decode the body.
    pub verbose: bool,

    /// Echo every header as it is parsed.
    pub show_header: bool,

    /// Skip printing the decoded body.
    pub hide_result: bool,
}
