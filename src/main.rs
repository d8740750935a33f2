//! API Gateway
//!
//! Authenticates requests with a shared `x-api-key` and forwards them to one of
//! two fixed backend services by path prefix.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                   API GATEWAY                    │
//!     Client Request     │  ┌─────────┐   ┌─────────┐   ┌───────────────┐   │
//!     ───────────────────┼─▶│ metrics │──▶│ routing │──▶│ api key guard │   │
//!                        │  │  stage  │   │         │   └───────┬───────┘   │
//!                        │  └─────────┘   └────┬────┘           │           │
//!                        │                     │ /health        ▼           │
//!                        │                     │ /metrics ┌───────────┐     │
//!     Client Response    │                     │ 404      │ forwarder │─────┼──▶ user-service
//!     ◀──────────────────┼─────────────────────┘          └───────────┘─────┼──▶ product-service
//!                        │                                                  │
//!                        │  startup: config → secrets loader → ApiKeyCell   │
//!                        └──────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use api_gateway::config::GatewayConfig;
use api_gateway::lifecycle::{shutdown_signal, Shutdown};
use api_gateway::observability::{init_logging, metrics::COLLECT_INTERVAL, GatewayMetrics};
use api_gateway::secrets::spawn_api_key_loader;
use api_gateway::security::ApiKeyCell;
use api_gateway::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let config = GatewayConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    tracing::info!(
        port = config.port,
        aws_region = %config.aws_region,
        api_key_configured = config.api_key.is_some(),
        "Configuration loaded"
    );

    // Serving starts immediately; protected routes reject until the key lands.
    let api_key = ApiKeyCell::new(config.api_key.clone());
    if !api_key.is_loaded() {
        spawn_api_key_loader(config.aws_region.clone(), api_key.clone());
    }

    let shutdown = Shutdown::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.trigger();
        }
    });

    let metrics = GatewayMetrics::new()?;
    let collector = metrics.spawn_collector(COLLECT_INTERVAL, shutdown.clone());

    let listener = TcpListener::bind(config.bind_address()).await?;

    let server = HttpServer::new(config, api_key, metrics);
    server.run(listener, shutdown.signal()).await?;

    let _ = collector.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
