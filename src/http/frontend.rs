//! Frontend responder: call the backend, fall back on failure, render.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::Html};

use crate::client::{LoadBalancedGreetingClient, StaticFallback, WithFallback};
use crate::http::render::render_index;
use crate::http::request::request_id;
use crate::observability::metrics;

/// State of the frontend service.
#[derive(Clone)]
pub struct FrontendState {
    /// Load-balanced client, kept for reloads and logging.
    pub backend: Arc<LoadBalancedGreetingClient>,
    /// `backend` wrapped with the static fallback.
    pub greetings: WithFallback,
}

impl FrontendState {
    pub fn new(backend: Arc<LoadBalancedGreetingClient>) -> Self {
        let greetings = WithFallback::new(backend.clone(), Arc::new(StaticFallback));
        Self { backend, greetings }
    }
}

/// `GET /`. Always answers 200: backend failures render the fallback.
pub async fn index(State(state): State<FrontendState>, headers: HeaderMap) -> Html<String> {
    metrics::record_request("frontend");
    let request_id = request_id(&headers);

    tracing::info!(
        request_id = request_id.as_deref().unwrap_or("unknown"),
        backend = %state.backend.address(),
        "Calling backend"
    );

    let served = state.greetings.call(request_id.clone()).await;
    if !served.is_fallback() {
        tracing::info!(
            request_id = request_id.as_deref().unwrap_or("unknown"),
            result = %served.greeting(),
            "Received result from backend"
        );
    }

    Html(render_index(served.greeting()))
}
