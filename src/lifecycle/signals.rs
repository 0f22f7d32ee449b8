//! OS signal handling.
//!
//! # Responsibilities
//! - SIGINT (Ctrl+C) → trigger graceful shutdown
//! - SIGHUP → reload the visitor configuration from disk
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP never shuts down; a failed reload only logs

use std::path::PathBuf;
use std::sync::Arc;

use crate::lifecycle::reload::reload_from_file;
use crate::lifecycle::shutdown::Shutdown;
use crate::visitor::AcceptHeaderDispatcher;

/// Listen for OS signals until shutdown.
pub async fn listen(
    shutdown: Shutdown,
    dispatcher: Arc<AcceptHeaderDispatcher>,
    config_path: Option<PathBuf>,
) {
    let mut stop = shutdown.subscribe();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
            tracing::info!("Interrupt received, shutting down");
            shutdown.trigger();
        }
        _ = reload_on_hangup(dispatcher, config_path) => {}
        _ = stop.recv() => {}
    }
}

#[cfg(unix)]
async fn reload_on_hangup(dispatcher: Arc<AcceptHeaderDispatcher>, config_path: Option<PathBuf>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler");
            return std::future::pending().await;
        }
    };

    while hangup.recv().await.is_some() {
        let Some(path) = config_path.as_deref() else {
            tracing::warn!("SIGHUP received but no configuration file was given");
            continue;
        };
        match reload_from_file(&dispatcher, path) {
            Ok(visitors) => tracing::info!(visitors, "Visitor configuration reloaded on SIGHUP"),
            Err(e) => tracing::error!(error = %e, "SIGHUP reload failed, keeping current table"),
        }
    }
}

#[cfg(not(unix))]
async fn reload_on_hangup(_dispatcher: Arc<AcceptHeaderDispatcher>, _config_path: Option<PathBuf>) {
    std::future::pending().await
}
