//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, known log level, known scheme)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::Settings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("transport.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("transport.user_agent must not be empty")]
    EmptyUserAgent,
    #[error("transport.default_scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("observability.log_level '{0}' is not a known level")]
    UnknownLogLevel(String),
}

pub fn validate_config(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.transport.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if settings.transport.user_agent.trim().is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }

    let scheme = settings.transport.default_scheme.as_str();
    if scheme != "http" && scheme != "https" {
        errors.push(ValidationError::UnsupportedScheme(scheme.to_string()));
    }

    if settings.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::UnknownLogLevel(
            settings.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
