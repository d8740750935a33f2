//! Configuration schema definitions.

use url::Url;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default region for the parameter store.
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Default base URL of the users backend.
pub const DEFAULT_USER_SERVICE_URL: &str = "http://user-service:8000";

/// Default base URL of the products backend.
pub const DEFAULT_PRODUCT_SERVICE_URL: &str = "http://product-service:8080";

/// Root configuration for the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Port bound on all interfaces.
    pub port: u16,

    /// Shared API key. `None` means it must be fetched from the parameter store.
    pub api_key: Option<String>,

    /// Region used by the parameter store client.
    pub aws_region: String,

    /// Base URL requests under `/users` are forwarded to.
    pub user_service_url: Url,

    /// Base URL requests under `/products` are forwarded to.
    pub product_service_url: Url,
}

impl GatewayConfig {
    /// Socket address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            aws_region: DEFAULT_AWS_REGION.to_string(),
            user_service_url: Url::parse(DEFAULT_USER_SERVICE_URL)
                .expect("default user service URL is valid"),
            product_service_url: Url::parse(DEFAULT_PRODUCT_SERVICE_URL)
                .expect("default product service URL is valid"),
        }
    }
}
