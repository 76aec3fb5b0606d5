//! Fetch argument parsing.
//!
//! Tokens are consumed by one forward iterator. Flags are matched by prefix,
//! unknown `-` tokens are ignored, and the first plain token is the URL.

use crate::config::RequestConfig;
use crate::error::ArgumentError;
use crate::http::transport::normalize_url;

/// Build a [`RequestConfig`] from the fetch tokens.
///
/// A single token containing spaces is treated as a whole command line and
/// split first. URLs without a scheme get `default_scheme`.
pub fn parse_args<S: AsRef<str>>(
    tokens: &[S],
    default_scheme: &str,
) -> Result<RequestConfig, ArgumentError> {
    let tokens: Vec<&str> = match tokens {
        [single] => single
            .as_ref()
            .split(' ')
            .filter(|t| !t.is_empty())
            .collect(),
        _ => tokens.iter().map(|t| t.as_ref()).collect(),
    };

    if tokens.is_empty() {
        return Err(ArgumentError::EmptyArguments);
    }

    let mut url = None;
    let mut config = RequestConfig::default();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        if token.starts_with("--hide-result") {
            config.hide_result = true;
        } else if token.starts_with("--show-header") {
            config.show_header = true;
        } else if token.starts_with("-v") {
            config.verbose = true;
        } else if token.starts_with("-X") {
            let value = iter
                .next()
                .ok_or_else(|| ArgumentError::MissingValue(token.to_string()))?;
            config.method = Some(value.to_lowercase());
        } else if !token.starts_with('-') {
            url = Some(token);
        } else {
            tracing::debug!(token, "Ignoring unknown flag");
        }
    }

    let url = url.ok_or(ArgumentError::MissingUrl)?;
    config.url = normalize_url(url, default_scheme)?;
    Ok(config)
}
