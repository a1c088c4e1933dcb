//! Errors of the outbound greeting call.

use thiserror::Error;

/// Why a call to the backend produced no greeting.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured backend address could not be turned into a request URL.
    #[error("invalid backend address `{0}`")]
    InvalidAddress(String),

    /// The logical service has no registered instances.
    #[error("no instances available for service `{0}`")]
    NoInstances(String),

    /// Connection refused, reset, DNS failure and the like.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// No complete response within the configured deadline.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The backend answered with a non-success status.
    #[error("backend {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The response body was not a greeting.
    #[error("invalid greeting from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Whether the failure says something about the health of the instance.
    pub fn is_instance_failure(&self) -> bool {
        match self {
            ClientError::Transport { .. } | ClientError::Timeout { .. } => true,
            ClientError::Status { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}
