//! Request forwarding to backend services.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the route's backend URL
//! - Send method, subpath, raw query, JSON body and `Content-Type: application/json` only
//! - Follow backend redirects, at most [`MAX_REDIRECTS`] of them
//! - Buffer the final backend reply and hand it to the relay / error mapping
//!
//! # Design Decisions
//! - One attempt per request; no retries, no timeout beyond the client's (none)
//! - 301/302 after POST and 303 after anything but HEAD continue as a bodyless GET;
//!   307/308 replay the method and body
//! - Inbound headers other than the fixed content type are dropped, `x-api-key` included

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::Response,
};
use http_body_util::LengthLimitError;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::de::IgnoredAny;
use thiserror::Error;
use url::Url;

use crate::http::request::request_id;
use crate::http::response::{relay, upstream_error, GatewayError};
use crate::routing::ServiceRoute;

/// Largest inbound body accepted for forwarding.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Redirects followed before a forward fails.
pub const MAX_REDIRECTS: usize = 5;

/// Why a forward did not produce a successful backend reply.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    #[error("invalid upstream request: {0}")]
    InvalidRequest(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] axum::Error),

    #[error("upstream redirect to an invalid location: {0}")]
    InvalidRedirect(#[source] url::ParseError),

    #[error("upstream exceeded {0} redirects")]
    TooManyRedirects(usize),

    #[error("upstream returned {status}")]
    Status { status: StatusCode, body: Bytes },
}

/// Shared outbound HTTP client.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
}

impl Forwarder {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }

    /// Forward `request` to `route`'s backend and relay the outcome.
    pub async fn forward(
        &self,
        route: &ServiceRoute,
        request: Request<Body>,
    ) -> Result<Response, GatewayError> {
        let request_id = request_id(&request).to_string();
        let (parts, body) = request.into_parts();

        let target = route
            .target_url(parts.uri.path(), parts.uri.query())
            .ok_or(GatewayError::NotFound)?;

        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| {
                if exceeds_limit(&e) {
                    GatewayError::PayloadTooLarge
                } else {
                    GatewayError::InvalidBody
                }
            })?;
        if !body.is_empty() && serde_json::from_slice::<IgnoredAny>(&body).is_err() {
            tracing::debug!(request_id = %request_id, "Rejected non-JSON request body");
            return Err(GatewayError::InvalidBody);
        }

        tracing::debug!(
            request_id = %request_id,
            service = route.name,
            method = %parts.method,
            target = %target,
            "Proxying request"
        );

        match self.send(parts.method, &target, body).await {
            Ok((status, body)) => Ok(relay(status, body)),
            Err(failure) => {
                tracing::warn!(
                    request_id = %request_id,
                    service = route.name,
                    target = %target,
                    error = %failure,
                    "Upstream error"
                );
                Err(upstream_error(&failure, route.fallback_error))
            }
        }
    }

    /// Send the request, following redirects, and buffer the final reply.
    async fn send(
        &self,
        method: Method,
        target: &str,
        body: Bytes,
    ) -> Result<(StatusCode, Bytes), UpstreamFailure> {
        let mut method = method;
        let mut body = Some(body);
        let mut target = target.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let (status, headers, reply) = self.exchange(&method, &target, body.clone()).await?;

            let location = headers
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .filter(|_| status.is_redirection());

            match location {
                Some(location) => {
                    target = Url::parse(&target)
                        .and_then(|current| current.join(location))
                        .map_err(UpstreamFailure::InvalidRedirect)?
                        .into();
                    if redirect_drops_body(status, &method) {
                        method = Method::GET;
                        body = None;
                    }
                    tracing::debug!(
                        status = %status,
                        location = %target,
                        "Following upstream redirect"
                    );
                }
                None if status.is_success() => return Ok((status, reply)),
                None => return Err(UpstreamFailure::Status { status, body: reply }),
            }
        }

        Err(UpstreamFailure::TooManyRedirects(MAX_REDIRECTS))
    }

    /// One request/response round trip. `None` sends no body and no content type.
    async fn exchange(
        &self,
        method: &Method,
        target: &str,
        body: Option<Bytes>,
    ) -> Result<(StatusCode, HeaderMap, Bytes), UpstreamFailure> {
        let mut request = Request::builder().method(method.clone()).uri(target);
        if body.is_some() {
            request = request.header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        let request = request.body(body.map(Body::from).unwrap_or_else(Body::empty))?;

        let response: hyper::Response<hyper::body::Incoming> =
            self.client.request(request).await?;
        let (parts, incoming) = response.into_parts();
        let reply = axum::body::to_bytes(Body::new(incoming), usize::MAX)
            .await
            .map_err(UpstreamFailure::Body)?;

        Ok((parts.status, parts.headers, reply))
    }
}

fn redirect_drops_body(status: StatusCode, method: &Method) -> bool {
    match status {
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => method == Method::POST,
        StatusCode::SEE_OTHER => method != Method::HEAD,
        _ => false,
    }
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

impl Default for Forwarder {
    fn default() -> Self {
        Self::new()
    }
}
