//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every registered instance
//! - Update instance health state based on results
//! - Publish the health gauge per instance

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::load_balancer::instance::Instance;
use crate::load_balancer::ServiceRegistry;
use crate::observability::metrics;

pub struct HealthMonitor {
    registry: Arc<ServiceRegistry>,
    config: HealthCheckConfig,
    client: Client<HttpConnector, Body>,
}

impl HealthMonitor {
    pub fn new(registry: Arc<ServiceRegistry>, config: HealthCheckConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            registry,
            config,
            client,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = self.config.interval_secs,
            path = %self.config.path,
            "Health monitor starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => self.check_all().await,
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every instance of the current registry snapshot once.
    pub async fn check_all(&self) {
        for instance in self.registry.pool().all_instances() {
            let healthy = self.probe(&instance).await;

            if healthy {
                instance.mark_success(self.config.healthy_threshold as usize);
            } else {
                instance.mark_failure(self.config.unhealthy_threshold as usize);
            }

            metrics::record_instance_health(
                &instance.service,
                &instance.addr.to_string(),
                instance.is_healthy(),
            );
        }
    }

    async fn probe(&self, instance: &Instance) -> bool {
        let addr = instance.addr;
        let request = match Request::builder()
            .method("GET")
            .uri(format!("http://{}{}", addr, self.config.path))
            .header("user-agent", "hello-cluster-health-check")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build health check request");
                return false;
            }
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);
        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let success = response.status().is_success();
                if !success {
                    tracing::warn!(addr = %addr, status = %response.status(), "Health check failed: non-success status");
                }
                success
            }
            Ok(Err(e)) => {
                tracing::warn!(addr = %addr, error = %e, "Health check failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(addr = %addr, "Health check failed: timeout");
                false
            }
        }
    }
}
