//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the visitor dispatch table
//! - Start metrics before the listener accepts traffic
//!
//! # Design Decisions
//! - Fail fast: a config or registry error is fatal at startup
//! - Listeners start last (traffic only when the table is ready)

use std::path::Path;

use thiserror::Error;

use crate::config::{load_config, ConfigError, RestConfig};
use crate::visitor::{AcceptHeaderDispatcher, DispatchTable, RegistryBuilder, RegistryError, VisitorCatalog};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("visitor registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Load the config file, or fall back to the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<RestConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = ?path, visitors = config.visitors.len(), "Configuration loaded");
            Ok(config)
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Ok(RestConfig::default())
        }
    }
}

/// Compile the config's visitor registrations.
pub fn build_table(config: &RestConfig) -> Result<DispatchTable, RegistryError> {
    RegistryBuilder::new(&config.parameters).build(&config.registrations())
}

/// Dispatcher over the built-in visitor catalog.
pub fn build_dispatcher(config: &RestConfig) -> Result<AcceptHeaderDispatcher, RegistryError> {
    Ok(AcceptHeaderDispatcher::new(
        build_table(config)?,
        VisitorCatalog::with_defaults(),
    ))
}
