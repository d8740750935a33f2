//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID)
//!     → middleware/metrics.rs (timer starts)
//!     → routing (health | metrics | /users | /products | 404)
//!     → middleware/api_key.rs (protected groups only)
//!     → forwarder.rs (backend call)
//!     → response.rs (relay or error envelope)
//!     → middleware/metrics.rs (record) → Send to client
//! ```

pub mod forwarder;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use forwarder::{Forwarder, UpstreamFailure};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::GatewayError;
pub use server::{AppState, HttpServer};
