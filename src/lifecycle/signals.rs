//! OS signal handling.
//!
//! - SIGINT / SIGTERM: graceful shutdown
//! - SIGHUP (unix): reload the configuration file

use std::path::PathBuf;

use crate::config::watcher::{reload, ConfigUpdates};

/// Resolve when the process is asked to terminate.
pub async fn terminated() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let term = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = term => tracing::info!("Received SIGTERM"),
    }
}

/// Reload `path` into `updates` on every SIGHUP.
#[cfg(unix)]
pub fn reload_on_hangup(path: PathBuf, updates: ConfigUpdates) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGHUP");
                return;
            }
        };
        while hangups.recv().await.is_some() {
            tracing::info!(path = %path.display(), "SIGHUP received, reloading configuration");
            if !reload(&path, &updates) && updates.is_closed() {
                break;
            }
        }
    });
}

#[cfg(not(unix))]
pub fn reload_on_hangup(_path: PathBuf, _updates: ConfigUpdates) {}
