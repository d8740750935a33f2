//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (PORT, API_KEY, AWS_REGION, *_SERVICE_URL)
//!     → loader.rs (lookup & parse)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to the server and the secret loader at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; nothing reloads it while the process runs
//! - Every variable has a default so the gateway starts with an empty environment
//! - The API key is the only late-bound value and lives in `security::ApiKeyCell`, not here

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::GatewayConfig;
