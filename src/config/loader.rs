//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::{
    GatewayConfig, DEFAULT_AWS_REGION, DEFAULT_PORT, DEFAULT_PRODUCT_SERVICE_URL,
    DEFAULT_USER_SERVICE_URL,
};
use crate::config::validation::{parse_port, parse_service_url, ValidationError};

pub const PORT_VAR: &str = "PORT";
pub const API_KEY_VAR: &str = "API_KEY";
pub const AWS_REGION_VAR: &str = "AWS_REGION";
pub const USER_SERVICE_URL_VAR: &str = "USER_SERVICE_URL";
pub const PRODUCT_SERVICE_URL_VAR: &str = "PRODUCT_SERVICE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl GatewayConfig {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load and validate configuration through `lookup`.
    ///
    /// Unset and empty variables both fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let mut errors = Vec::new();

        let port = match get(PORT_VAR) {
            Some(raw) => parse_port(PORT_VAR, &raw)
                .map_err(|e| errors.push(e))
                .unwrap_or(DEFAULT_PORT),
            None => DEFAULT_PORT,
        };

        let user_service_url = parse_service_url(
            USER_SERVICE_URL_VAR,
            &get(USER_SERVICE_URL_VAR).unwrap_or_else(|| DEFAULT_USER_SERVICE_URL.to_string()),
        )
        .map_err(|e| errors.push(e));

        let product_service_url = parse_service_url(
            PRODUCT_SERVICE_URL_VAR,
            &get(PRODUCT_SERVICE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_PRODUCT_SERVICE_URL.to_string()),
        )
        .map_err(|e| errors.push(e));

        match (user_service_url, product_service_url) {
            (Ok(user_service_url), Ok(product_service_url)) if errors.is_empty() => Ok(Self {
                port,
                api_key: get(API_KEY_VAR),
                aws_region: get(AWS_REGION_VAR)
                    .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
                user_service_url,
                product_service_url,
            }),
            _ => Err(ConfigError::Validation(errors)),
        }
    }
}
