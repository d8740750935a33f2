//! Request pipeline stages.

pub mod api_key;
pub mod metrics;

pub use api_key::require_api_key;
pub use metrics::track_metrics;
