//! Request metrics stage.
//! Times the rest of the pipeline and records the outcome, whatever it is.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::GatewayMetrics;

pub async fn track_metrics(
    State(metrics): State<GatewayMetrics>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    metrics.record_request(&method, &route, response.status().as_u16(), start.elapsed());
    response
}
