//! Minimal HTTP fetcher library.
//!
//! One URL, one request: response headers are captured line by line, the
//! body is buffered, the charset is inferred from `Content-Type` and the
//! body is decoded and printed.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;

pub use config::{RequestConfig, Settings};
pub use error::{ArgumentError, DecodeError, FetchError};
pub use http::{HeaderStore, Launcher, ResponseDecoder};
