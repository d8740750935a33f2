//! Secret loading subsystem.
//!
//! # Data Flow
//! ```text
//! startup (API_KEY unset)
//!     → loader.rs (spawned task, runs once)
//!     → store.rs (ParameterStore: AWS SSM, or in-memory in tests)
//!     → security::ApiKeyCell::set
//! ```
//!
//! # Design Decisions
//! - One attempt, no retry loop; failure is logged and the key stays unset
//! - The server does not wait for the load; until it finishes every
//!   protected request is rejected

pub mod loader;
pub mod store;

pub use loader::{load_api_key, spawn_api_key_loader, API_KEY_PARAMETER};
pub use store::{MemoryParameterStore, ParameterStore, SecretError, SsmParameterStore};
