//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RestConfig (validated, immutable)
//!     → registrations() feed the visitor registry
//!
//! On reload (file change, SIGHUP, POST /admin/reload):
//!     loader.rs loads new config
//!     → validation.rs validates
//!     → registry builds a new dispatch table
//!     → atomic swap in the AcceptHeaderDispatcher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AdminConfig, ListenerConfig, ObservabilityConfig, RestConfig, TimeoutConfig, VisitorConfig};
