//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

/// Sending half of the configuration update channel.
pub type ConfigUpdates = mpsc::UnboundedSender<AppConfig>;

/// Reload `path` and publish it on `updates`.
///
/// Invalid files are logged and dropped; the running configuration stays.
/// Returns whether a new configuration was published.
pub fn reload(path: &Path, updates: &ConfigUpdates) -> bool {
    match load_config(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Configuration reloaded");
            updates.send(config).is_ok()
        }
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to reload config, keeping current configuration"
            );
            false
        }
    }
}

/// Watches the configuration file and publishes every valid new version.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: ConfigUpdates,
}

impl ConfigWatcher {
    /// Create a watcher for `path`.
    ///
    /// Returns the watcher and the receiver the server consumes updates from.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            updates,
        };
        (watcher, rx)
    }

    /// Another handle on the update channel, e.g. for SIGHUP reloads.
    pub fn updates(&self) -> ConfigUpdates {
        self.updates.clone()
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, updates } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::debug!(kind = ?event.kind, "Config file change detected");
                    reload(&path, &updates);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %watched.display(), "Config watcher started");
        Ok(watcher)
    }
}
