//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use api_gateway::config::GatewayConfig;
use api_gateway::{ApiKeyCell, GatewayMetrics, HttpServer};
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use url::Url;

pub const API_KEY: &str = "test-key";

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockBackend {
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> Captured {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("backend received no request")
    }
}

/// Start a backend that records every request and answers with a fixed reply.
pub async fn start_programmable_backend(status: u16, body: &'static str) -> MockBackend {
    start_backend(move || (StatusCode::from_u16(status).unwrap(), body).into_response()).await
}

/// Start a backend that records every request and redirects it to `location`.
pub async fn start_redirecting_backend(status: u16, location: String) -> MockBackend {
    start_backend(move || {
        (
            StatusCode::from_u16(status).unwrap(),
            [(header::LOCATION, location.clone())],
        )
            .into_response()
    })
    .await
}

async fn start_backend<F>(reply: F) -> MockBackend
where
    F: Fn() -> Response + Clone + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let captured = captured.clone();
        let reply = reply.clone();
        async move {
            let (parts, received) = request.into_parts();
            let received = axum::body::to_bytes(received, usize::MAX).await.unwrap();
            captured.lock().unwrap().push(Captured {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers: parts.headers,
                body: received,
            });
            reply()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, requests }
}

/// A URL nothing listens on.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}", addr)).unwrap()
}

pub fn config(users: Url, products: Url) -> GatewayConfig {
    GatewayConfig {
        port: 0,
        api_key: Some(API_KEY.to_string()),
        user_service_url: users,
        product_service_url: products,
        ..GatewayConfig::default()
    }
}

/// Build a gateway router around `api_key`.
pub fn gateway(config: GatewayConfig, api_key: ApiKeyCell) -> (Router, GatewayMetrics) {
    let metrics = GatewayMetrics::new().unwrap();
    let server = HttpServer::new(config, api_key, metrics.clone());
    (server.router(), metrics)
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
