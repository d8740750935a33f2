//! Configuration validation.
//!
//! # Responsibilities
//! - Parse raw environment values into typed settings
//! - Check value ranges (ports) and URL shape (absolute, `http`, has host)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Only plain `http` backends are accepted; the outbound connector does not speak TLS

use thiserror::Error;
use url::Url;

/// A single rejected configuration value.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{var}: `{value}` is not a valid port")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var}: `{value}` is not a valid URL ({reason})")]
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: url::ParseError,
    },

    #[error("{var}: scheme `{scheme}` is not supported, expected `http`")]
    UnsupportedScheme { var: &'static str, scheme: String },

    #[error("{var}: `{value}` has no host")]
    MissingHost { var: &'static str, value: String },
}

/// Parse a port number.
pub fn parse_port(var: &'static str, value: &str) -> Result<u16, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidPort {
            var,
            value: value.to_string(),
        })
}

/// Parse and check a backend base URL.
pub fn parse_service_url(var: &'static str, value: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(value.trim()).map_err(|reason| ValidationError::InvalidUrl {
        var,
        value: value.to_string(),
        reason,
    })?;

    if url.scheme() != "http" {
        return Err(ValidationError::UnsupportedScheme {
            var,
            scheme: url.scheme().to_string(),
        });
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::MissingHost {
            var,
            value: value.to_string(),
        });
    }

    Ok(url)
}
