//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     API_KEY env var ─┐
//!                      ├─→ ApiKeyCell (single writer, many readers)
//!     secrets loader ──┘
//!
//! Incoming request to a protected route:
//!     → http::middleware::api_key (reads x-api-key)
//!     → ApiKeyCell::verify
//!     → Pass to forwarder, or 401
//! ```
//!
//! # Design Decisions
//! - Fail closed: an unset key rejects every request
//! - The cell is injected into the guard; there is no global key

pub mod api_key;

pub use api_key::{ApiKeyCell, API_KEY_HEADER};
