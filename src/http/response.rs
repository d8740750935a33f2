//! Response shaping.
//!
//! # Responsibilities
//! - Relay successful backend replies verbatim
//! - Map failures onto the `{"error": ...}` envelope with a matching status
//!
//! # Design Decisions
//! - JSON backend bodies are passed through byte-for-byte
//! - A backend error body that is empty or JSON-falsy is replaced by the route's fallback string

use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::IgnoredAny;
use serde_json::{json, Value};
use thiserror::Error;

use crate::http::forwarder::UpstreamFailure;

/// Terminal failure of a single request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or mismatched `x-api-key`.
    #[error("Unauthorized")]
    Unauthorized,

    /// No route matched.
    #[error("Not found")]
    NotFound,

    /// The inbound body could not be read or is not JSON.
    #[error("Invalid JSON body")]
    InvalidBody,

    /// The inbound body is over the forwarding limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// The backend failed; `error` is the envelope payload.
    #[error("upstream error ({status}): {error}")]
    Upstream { status: StatusCode, error: Value },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            Self::Upstream { error, .. } => error,
            other => Value::String(other.to_string()),
        };
        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Mirror a successful backend reply.
///
/// JSON bodies keep their exact bytes, other text becomes a JSON string and an
/// empty body stays empty.
pub fn relay(status: StatusCode, body: Bytes) -> Response {
    if body.is_empty() {
        return status.into_response();
    }

    if serde_json::from_slice::<IgnoredAny>(&body).is_ok() {
        return (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response();
    }

    (status, Json(Value::String(String::from_utf8_lossy(&body).into_owned()))).into_response()
}

/// Map a failed forward onto the gateway error envelope.
///
/// Backend error replies keep their status and body; transport failures become
/// 500 with `fallback`.
pub fn upstream_error(failure: &UpstreamFailure, fallback: &'static str) -> GatewayError {
    match failure {
        UpstreamFailure::Status { status, body } => GatewayError::Upstream {
            status: *status,
            error: error_payload(body).unwrap_or_else(|| Value::from(fallback)),
        },
        _ => GatewayError::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: Value::from(fallback),
        },
    }
}

fn error_payload(body: &[u8]) -> Option<Value> {
    let value = serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
    (!is_falsy(&value)).then_some(value)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_fixed_envelopes() {
        let res = GatewayError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(res).await, json!({ "error": "Unauthorized" }));

        let res = GatewayError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await, json!({ "error": "Not found" }));

        let res = GatewayError::InvalidBody.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await, json!({ "error": "Invalid JSON body" }));

        let res = GatewayError::PayloadTooLarge.into_response();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(res).await, json!({ "error": "Payload too large" }));
    }

    #[tokio::test]
    async fn test_upstream_envelope_wraps_payload() {
        let res = GatewayError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            error: json!({ "msg": "down" }),
        }
        .into_response();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(res).await, json!({ "error": { "msg": "down" } }));
    }

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    fn status_failure(status: u16, body: &'static str) -> UpstreamFailure {
        UpstreamFailure::Status {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_relay_keeps_json_bytes() {
        let raw = r#"{"z":1,"a":[true,null]}"#;
        let res = relay(StatusCode::CREATED, Bytes::from_static(raw.as_bytes()));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_bytes(res).await, raw.as_bytes());
    }

    #[tokio::test]
    async fn test_relay_text_and_empty() {
        let res = relay(StatusCode::OK, Bytes::from_static(b"plain"));
        assert_eq!(body_json(res).await, json!("plain"));

        let res = relay(StatusCode::NO_CONTENT, Bytes::new());
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(res).await.is_empty());
    }

    #[test]
    fn test_upstream_error_passes_backend_body() {
        let err = upstream_error(&status_failure(503, r#"{"msg":"down"}"#), "User service error");
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        let GatewayError::Upstream { error, .. } = err else {
            panic!("expected upstream error");
        };
        assert_eq!(error, json!({ "msg": "down" }));

        let GatewayError::Upstream { error, .. } =
            upstream_error(&status_failure(404, "no such user"), "User service error")
        else {
            panic!("expected upstream error");
        };
        assert_eq!(error, json!("no such user"));
    }

    #[test]
    fn test_upstream_error_falls_back_on_falsy_body() {
        for body in ["", "null", "false", "0", r#""""#] {
            let err = upstream_error(&status_failure(502, body), "Product service error");
            assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
            let GatewayError::Upstream { error, .. } = err else {
                panic!("expected upstream error");
            };
            assert_eq!(error, json!("Product service error"), "body {body:?}");
        }
    }

    #[test]
    fn test_body_read_failure_is_500() {
        let failure = UpstreamFailure::Body(axum::Error::new("reset"));
        let err = upstream_error(&failure, "User service error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_redirect_exhaustion_uses_fallback() {
        let err = upstream_error(&UpstreamFailure::TooManyRedirects(5), "User service error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let GatewayError::Upstream { error, .. } = err else {
            panic!("expected upstream error");
        };
        assert_eq!(error, json!("User service error"));
    }
}
