//! API key guard.
//! Rejects protected requests whose `x-api-key` does not match the shared key.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::response::GatewayError;
use crate::security::{ApiKeyCell, API_KEY_HEADER};

pub async fn require_api_key(
    State(api_key): State<ApiKeyCell>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if !api_key.verify(provided) {
        tracing::warn!(
            request_id = %request_id(&request),
            path = %request.uri().path(),
            key_present = provided.is_some(),
            key_loaded = api_key.is_loaded(),
            "Rejected request with invalid API key"
        );
        return GatewayError::Unauthorized.into_response();
    }

    next.run(request).await
}
