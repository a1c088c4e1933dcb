//! Fallback decorator around a [`GreetingClient`].

use std::sync::Arc;

use crate::client::GreetingClient;
use crate::greeting::Greeting;
use crate::observability::metrics;

/// Supplies the greeting used when the real client fails.
pub trait Fallback: Send + Sync {
    fn greeting(&self) -> Greeting;
}

/// Always answers with [`Greeting::fallback`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFallback;

impl Fallback for StaticFallback {
    fn greeting(&self) -> Greeting {
        Greeting::fallback()
    }
}

/// Which path produced a greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Served {
    Backend(Greeting),
    Fallback(Greeting),
}

impl Served {
    pub fn greeting(&self) -> &Greeting {
        match self {
            Served::Backend(g) | Served::Fallback(g) => g,
        }
    }

    pub fn into_greeting(self) -> Greeting {
        match self {
            Served::Backend(g) | Served::Fallback(g) => g,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Served::Fallback(_))
    }
}

/// Calls `primary`, substituting the `fallback` greeting on any error.
///
/// [`WithFallback::call`] cannot fail.
#[derive(Clone)]
pub struct WithFallback {
    primary: Arc<dyn GreetingClient>,
    fallback: Arc<dyn Fallback>,
}

impl WithFallback {
    pub fn new(primary: Arc<dyn GreetingClient>, fallback: Arc<dyn Fallback>) -> Self {
        Self { primary, fallback }
    }

    pub async fn call(&self, request_id: Option<String>) -> Served {
        match self.primary.fetch(request_id.clone()).await {
            Ok(greeting) => {
                metrics::record_backend_call("backend");
                Served::Backend(greeting)
            }
            Err(e) => {
                tracing::warn!(
                    request_id = request_id.as_deref().unwrap_or("unknown"),
                    error = %e,
                    "Backend call failed, using fallback"
                );
                metrics::record_backend_call("fallback");
                Served::Fallback(self.fallback.greeting())
            }
        }
    }
}
