//! Visitor table reload.
//!
//! A reload builds a complete new table and publishes it with one atomic
//! swap. If the build fails the running table stays in place.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use crate::config::{load_config, ConfigError, RestConfig};
use crate::lifecycle::startup::build_table;
use crate::visitor::{AcceptHeaderDispatcher, RegistryError};

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Build a table from `config` and swap it in. Returns the new visitor count.
pub fn apply_config(dispatcher: &AcceptHeaderDispatcher, config: &RestConfig) -> Result<usize, RegistryError> {
    let table = build_table(config)?;
    let visitors = table.len();
    dispatcher.replace_table(table);
    Ok(visitors)
}

/// Re-read the config file and apply it.
pub fn reload_from_file(dispatcher: &AcceptHeaderDispatcher, path: &Path) -> Result<usize, ReloadError> {
    let config = load_config(path)?;
    Ok(apply_config(dispatcher, &config)?)
}

/// Apply configs from the watcher until shutdown.
pub async fn run_reload_loop(
    dispatcher: Arc<AcceptHeaderDispatcher>,
    mut updates: mpsc::UnboundedReceiver<RestConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(config) => match apply_config(&dispatcher, &config) {
                    Ok(visitors) => tracing::info!(visitors, "Visitor configuration reloaded"),
                    Err(e) => tracing::error!(error = %e, "Rejected visitor configuration, keeping current table"),
                },
                None => break,
            },
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!("Reload loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisitorConfig;
    use crate::lifecycle::startup::build_dispatcher;
    use crate::visitor::PatternSource;

    fn xml_only() -> RestConfig {
        let mut config = RestConfig::default();
        config.visitors = vec![VisitorConfig {
            handler: "xml".into(),
            patterns: Some(PatternSource::Literal(vec![vec!["(^.*/.*$)".into()]])),
            priority: None,
        }];
        config
    }

    #[test]
    fn test_failed_reload_keeps_table() {
        let dispatcher = build_dispatcher(&RestConfig::default()).unwrap();
        let before = dispatcher.table();

        let mut broken = RestConfig::default();
        broken.visitors[0].patterns = None;
        assert!(apply_config(&dispatcher, &broken).is_err());

        assert!(Arc::ptr_eq(&before, &dispatcher.table()));
    }

    #[tokio::test]
    async fn test_reload_loop_applies_updates() {
        let dispatcher = Arc::new(build_dispatcher(&RestConfig::default()).unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = tokio::spawn(run_reload_loop(dispatcher.clone(), rx, shutdown_rx));
        tx.send(xml_only()).unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(dispatcher.table().len(), 1);
        assert_eq!(dispatcher.select(Some("application/json")).unwrap().0.as_str(), "xml");
    }

    #[test]
    fn test_reload_from_file() {
        use std::io::Write;

        let dispatcher = build_dispatcher(&RestConfig::default()).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[visitors]]\nhandler = \"xml\"\npatterns = [[\"(^application/xml$)\"], [\"(^text/xml$)\"]]"
        )
        .unwrap();

        assert_eq!(reload_from_file(&dispatcher, file.path()).unwrap(), 1);
        assert!(dispatcher.select(Some("application/json")).is_err());
    }
}
