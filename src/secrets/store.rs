//! [`ParameterStore`] trait and its backends.

use std::collections::HashMap;
use std::future::Future;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::error::DisplayErrorContext;
use thiserror::Error;

/// Errors produced while fetching a secret.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The store could not be reached or refused the request.
    #[error("parameter store request failed: {0}")]
    Store(String),

    /// The parameter exists but carries no value, or does not exist.
    #[error("parameter `{0}` has no value")]
    Missing(String),
}

/// Read access to named, optionally encrypted, parameters.
pub trait ParameterStore: Send + Sync {
    /// Fetch the decrypted value of `name`.
    ///
    /// Returns `Ok(None)` if the parameter has no value.
    fn get_parameter(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, SecretError>> + Send;
}

/// AWS Systems Manager Parameter Store.
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterStore {
    /// Build a client for `region` using the default credential chain.
    pub async fn from_region(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: aws_sdk_ssm::Client::new(&config),
        }
    }
}

impl ParameterStore for SsmParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>, SecretError> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| SecretError::Store(DisplayErrorContext(e).to_string()))?;

        Ok(output.parameter.and_then(|p| p.value))
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryParameterStore {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every request fails, as if the service were unreachable.
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl ParameterStore for MemoryParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>, SecretError> {
        if self.unavailable {
            return Err(SecretError::Store("store unavailable".into()));
        }
        Ok(self.values.get(name).cloned())
    }
}
