//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms, process gauges)
//!
//! Consumers:
//!     → stdout (fmt subscriber, filtered by RUST_LOG)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the access log span
//! - The metrics recorder belongs to one gateway instance, not the process

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{GatewayMetrics, MetricsError};
