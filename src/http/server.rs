//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: health, metrics, the two service groups, 404 fallback
//! - Wire up middleware (request ID, access log, metrics, API key guard)
//! - Bind server to listener and serve until shutdown

use std::future::Future;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::forwarder::Forwarder;
use crate::http::handlers;
use crate::http::middleware::track_metrics;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::observability::GatewayMetrics;
use crate::routing::service_routes;
use crate::security::ApiKeyCell;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub metrics: GatewayMetrics,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server.
    ///
    /// `api_key` may still be empty; the guard sees the key as soon as it is set.
    pub fn new(config: GatewayConfig, api_key: ApiKeyCell, metrics: GatewayMetrics) -> Self {
        let state = AppState {
            forwarder: Forwarder::new(),
            metrics,
        };

        let router = Self::build_router(&config, api_key, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, api_key: ApiKeyCell, state: AppState) -> Router {
        let services = service_routes(config)
            .into_iter()
            .fold(Router::<AppState>::new(), |router, route| {
                router.merge(route.mount(api_key.clone()))
            });

        Router::<AppState>::new()
            .route("/health", get(handlers::health).fallback(handlers::not_found))
            .route("/metrics", get(handlers::metrics).fallback(handlers::not_found))
            .merge(services)
            .fallback(handlers::not_found)
            .layer(middleware::from_fn_with_state(
                state.metrics.clone(),
                track_metrics,
            ))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` completes, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            user_service = %self.config.user_service_url,
            product_service = %self.config.product_service_url,
            "API Gateway listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
