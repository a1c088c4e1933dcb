//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router for the backend or the frontend role
//! - Wire up middleware (request id, tracing, request timeout)
//! - Apply configuration updates while serving
//! - Run the active health monitor (frontend, when enabled)
//! - Stop gracefully on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::client::{ClientError, LoadBalancedGreetingClient};
use crate::config::AppConfig;
use crate::health::active::HealthMonitor;
use crate::http::backend::{self, BackendState};
use crate::http::frontend::{self, FrontendState};
use crate::http::health;
use crate::http::request::MakeRequestUuid;
use crate::load_balancer::ServiceRegistry;

/// What a configuration update changes in the running service.
enum ReloadTarget {
    Backend(BackendState),
    Frontend {
        client: Arc<LoadBalancedGreetingClient>,
        /// Timeout of the running router; reloads cannot change it.
        server_timeout: Duration,
    },
}

impl ReloadTarget {
    fn apply(&self, config: &AppConfig) {
        match self {
            ReloadTarget::Backend(state) => {
                state.settings.store(Arc::new(config.backend.clone()));
                tracing::info!(message = %config.backend.message, "Backend settings updated");
            }
            ReloadTarget::Frontend {
                client,
                server_timeout,
            } => {
                if config.timeouts.request() >= *server_timeout {
                    tracing::error!(
                        request_ms = config.timeouts.request_ms,
                        server_timeout = ?server_timeout,
                        "Rejected frontend settings: request timeout exceeds server timeout"
                    );
                    return;
                }
                match client.reload(config) {
                    Ok(()) => tracing::info!(
                        backend = %config.frontend.backend_address,
                        "Frontend settings updated"
                    ),
                    Err(e) => tracing::error!(error = %e, "Rejected frontend settings"),
                }
            }
        }
    }
}

/// HTTP server for one of the two services.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    reload: ReloadTarget,
    health_monitor: Option<HealthMonitor>,
}

impl HttpServer {
    /// Backend service answering with the configured message and `host_name`.
    pub fn backend(config: AppConfig, host_name: impl Into<Arc<str>>) -> Self {
        let state = BackendState::new(config.backend.clone(), host_name);

        let routes = Router::new()
            .route("/", get(backend::hello))
            .with_state(state.clone());

        Self {
            router: Self::finish_router(routes, &config),
            config,
            reload: ReloadTarget::Backend(state),
            health_monitor: None,
        }
    }

    /// Frontend service calling the backend through the load-balanced client.
    pub fn frontend(config: AppConfig) -> Result<Self, ClientError> {
        let registry = Arc::new(ServiceRegistry::new(&config.discovery));
        let client = Arc::new(LoadBalancedGreetingClient::new(&config, registry.clone())?);

        let health_monitor = config
            .health_check
            .enabled
            .then(|| HealthMonitor::new(registry, config.health_check.clone()));

        let server_timeout = config.timeouts.server();
        let routes = Router::new()
            .route("/", get(frontend::index))
            .with_state(FrontendState::new(client.clone()));

        Ok(Self {
            router: Self::finish_router(routes, &config),
            config,
            reload: ReloadTarget::Frontend {
                client,
                server_timeout,
            },
            health_monitor,
        })
    }

    /// Add probes and the middleware stack shared by both roles.
    #[allow(deprecated)]
    fn finish_router(routes: Router, config: &AppConfig) -> Router {
        routes
            .route("/healthz", get(health::liveness))
            .route("/readyz", get(health::readiness))
            .layer(TimeoutLayer::new(config.timeouts.server()))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A clone of the router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config the server was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configurations received on `updates` are applied while serving. The
    /// update channel closing does not stop the server.
    pub async fn run(
        self,
        listener: TcpListener,
        mut updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if let Some(monitor) = self.health_monitor {
            let monitor_shutdown = shutdown.resubscribe();
            tokio::spawn(monitor.run(monitor_shutdown));
        }

        let reload = self.reload;
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = updates.recv() => match update {
                        Some(config) => reload.apply(&config),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
            tracing::debug!("Config update loop stopped");
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
