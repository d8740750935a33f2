//! Service route table.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    routing::any,
    Router,
};
use url::Url;

use crate::config::GatewayConfig;
use crate::http::middleware::require_api_key;
use crate::http::server::AppState;
use crate::routing::matcher::PathPrefixMatcher;
use crate::security::ApiKeyCell;

/// A backend service mounted under a path prefix.
#[derive(Debug, Clone)]
pub struct ServiceRoute {
    /// Route identifier for logging.
    pub name: &'static str,

    /// Mount prefix.
    pub matcher: PathPrefixMatcher,

    /// Base URL the subpath is appended to.
    pub base_url: Url,

    /// Error payload used when the backend gives nothing better.
    pub fallback_error: &'static str,
}

impl ServiceRoute {
    pub fn users(base_url: Url) -> Self {
        Self {
            name: "users",
            matcher: PathPrefixMatcher::new("/users"),
            base_url,
            fallback_error: "User service error",
        }
    }

    pub fn products(base_url: Url) -> Self {
        Self {
            name: "products",
            matcher: PathPrefixMatcher::new("/products"),
            base_url,
            fallback_error: "Product service error",
        }
    }

    /// Backend URL for an inbound path and raw query string.
    ///
    /// `None` when `path` is not under this route's prefix.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Option<String> {
        let subpath = self.matcher.strip(path)?;
        let mut target = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), subpath);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        Some(target)
    }

    /// Axum routes for this service, guarded by the API key.
    ///
    /// Covers `{prefix}`, `{prefix}/` and everything below.
    pub fn mount(self, api_key: ApiKeyCell) -> Router<AppState> {
        let prefix = self.matcher.prefix().to_string();
        let route = Arc::new(self);
        let handler = move |State(state): State<AppState>, request: Request<Body>| {
            let route = route.clone();
            async move { state.forwarder.forward(&route, request).await }
        };

        Router::new()
            .route(&prefix, any(handler.clone()))
            .route(&format!("{prefix}/"), any(handler.clone()))
            .route(&format!("{prefix}/{{*rest}}"), any(handler))
            .route_layer(middleware::from_fn_with_state(api_key, require_api_key))
    }
}

/// The fixed route table.
pub fn service_routes(config: &GatewayConfig) -> Vec<ServiceRoute> {
    vec![
        ServiceRoute::users(config.user_service_url.clone()),
        ServiceRoute::products(config.product_service_url.clone()),
    ]
}
