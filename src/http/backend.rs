//! Backend responder: the configured message plus the serving host name.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{extract::State, Json};

use crate::config::BackendSettings;
use crate::greeting::Greeting;
use crate::observability::metrics;

/// State of the backend service.
///
/// `settings` is swapped on configuration reload; `host_name` is resolved
/// once at startup and never changes.
#[derive(Clone)]
pub struct BackendState {
    pub settings: Arc<ArcSwap<BackendSettings>>,
    pub host_name: Arc<str>,
}

impl BackendState {
    pub fn new(settings: BackendSettings, host_name: impl Into<Arc<str>>) -> Self {
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            host_name: host_name.into(),
        }
    }

    pub fn greeting(&self) -> Greeting {
        Greeting {
            message: Some(self.settings.load().message.clone()),
            source: Some(self.host_name.to_string()),
        }
    }
}

/// `GET /`
pub async fn hello(State(state): State<BackendState>) -> Json<Greeting> {
    metrics::record_request("backend");
    let greeting = state.greeting();
    tracing::debug!(greeting = %greeting, "Serving greeting");
    Json(greeting)
}
