//! The greeting payload exchanged between frontend and backend.

use serde::{Deserialize, Serialize};

/// Message served when the backend cannot be reached.
pub const FALLBACK_MESSAGE: &str = "Your backend is in another castle";

/// Source reported alongside [`FALLBACK_MESSAGE`].
pub const FALLBACK_SOURCE: &str = "fallback implementation";

/// A greeting and the host that produced it.
///
/// Empty or missing fields are left out of the serialized JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub source: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl Greeting {
    pub fn new(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            source: Some(source.into()),
        }
    }

    /// The static substitute used when the backend call fails.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_MESSAGE, FALLBACK_SOURCE)
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }
}

impl std::fmt::Display for Greeting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Greeting(message={:?}, source={:?})", self.message(), self.source())
    }
}
