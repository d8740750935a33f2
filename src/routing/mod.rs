//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (which service group is mounted at this prefix)
//!     → matcher.rs (segment-aligned prefix match, subpath extraction)
//!     → Return: ServiceRoute + subpath, or the 404 fallback
//!
//! Route table (at startup):
//!     GatewayConfig
//!     → /users    → USER_SERVICE_URL
//!     → /products → PRODUCT_SERVICE_URL
//! ```
//!
//! # Design Decisions
//! - Routes are fixed at startup
//! - Prefix matching only, case-sensitive, aligned on `/` boundaries
//! - The prefix is stripped before forwarding

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::{service_routes, ServiceRoute};
