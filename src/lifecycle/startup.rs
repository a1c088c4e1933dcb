//! Startup orchestration.
//!
//! Anything that fails here is fatal: the process exits before binding its
//! listener, so an unhealthy instance never receives traffic.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{load_config, AppConfig, ConfigError};

/// Errors that prevent a service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("unable to resolve host name (HOSTNAME unset and system host name empty)")]
    HostName,

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Host name of this process, resolved once at startup.
///
/// `HOSTNAME` wins when set, so containers can override what the OS reports.
pub fn resolve_host_name() -> Result<String, StartupError> {
    let system = gethostname::gethostname().into_string().ok();
    resolve_host_name_from(std::env::var("HOSTNAME").ok(), system)
}

/// First non-blank value among `env` and `system`, trimmed.
pub fn resolve_host_name_from(
    env: Option<String>,
    system: Option<String>,
) -> Result<String, StartupError> {
    env.into_iter()
        .chain(system)
        .map(|candidate| candidate.trim().to_string())
        .find(|candidate| !candidate.is_empty())
        .ok_or(StartupError::HostName)
}

/// Load the configuration file, or the defaults when no path is given.
pub fn load_startup_config(path: Option<&Path>) -> Result<AppConfig, StartupError> {
    match path {
        Some(path) => load_config(path).map_err(|source| StartupError::Config {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(AppConfig::default()),
    }
}

/// Bind the listener configured in `config`.
pub async fn bind(config: &AppConfig) -> Result<tokio::net::TcpListener, StartupError> {
    let address = &config.listener.bind_address;
    tokio::net::TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })
}
