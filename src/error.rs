//! Error types shared across the fetch pipeline.
//!
//! Every failure of a single launch ends up as a [`FetchError`], which the
//! CLI layer turns into the printed `error occurred: ...` block.

use std::io;
use thiserror::Error;

use crate::config::loader::ConfigError;

/// Problems with the command-line tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgumentError {
    #[error("empty arguments")]
    EmptyArguments,
    #[error("missing value after {0}")]
    MissingValue(String),
    #[error("no url given")]
    MissingUrl,
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// The body could not be turned into text with the inferred encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("'{encoding}' codec can't decode the response body")]
    Malformed { encoding: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Curl(#[from] curl::Error),
    #[error("transport task failed: {0}")]
    TransportTask(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
