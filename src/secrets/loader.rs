//! One-shot API key loading.

use tokio::task::JoinHandle;

use crate::secrets::store::{ParameterStore, SecretError, SsmParameterStore};
use crate::security::ApiKeyCell;

/// Parameter holding the shared API key.
pub const API_KEY_PARAMETER: &str = "/app/microservices-cicd/api-key";

/// Fetch `name` from `store` into `cell` unless the cell already holds a key.
pub async fn load_api_key<S: ParameterStore>(
    store: &S,
    name: &str,
    cell: &ApiKeyCell,
) -> Result<(), SecretError> {
    if cell.is_loaded() {
        tracing::debug!("API key supplied by configuration, skipping parameter store");
        return Ok(());
    }

    let value = store
        .get_parameter(name)
        .await?
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SecretError::Missing(name.to_string()))?;

    cell.set(value);
    tracing::info!(parameter = %name, "API key loaded from parameter store");
    Ok(())
}

/// Load the key from AWS SSM in the background.
///
/// Failures are logged and leave `cell` empty.
pub fn spawn_api_key_loader(region: String, cell: ApiKeyCell) -> JoinHandle<()> {
    tokio::spawn(async move {
        let store = SsmParameterStore::from_region(&region).await;
        if let Err(e) = load_api_key(&store, API_KEY_PARAMETER, &cell).await {
            tracing::error!(
                error = %e,
                region = %region,
                parameter = API_KEY_PARAMETER,
                "Failed to load API key"
            );
        }
    })
}
