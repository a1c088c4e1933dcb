//! Metrics collection and exposition.
//!
//! # Metrics
//! - `greeting_requests_total` (counter): requests by `service`
//! - `greeting_backend_calls_total` (counter): frontend calls by `outcome`
//!   (`backend` or `fallback`)
//! - `greeting_instance_health` (gauge): 1=healthy, 0=unhealthy, by
//!   `service` and `address`
//!
//! Without an installed recorder every function here is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(service: &'static str) {
    metrics::counter!("greeting_requests_total", "service" => service).increment(1);
}

pub fn record_backend_call(outcome: &'static str) {
    metrics::counter!("greeting_backend_calls_total", "outcome" => outcome).increment(1);
}

pub fn record_instance_health(service: &str, address: &str, healthy: bool) {
    metrics::gauge!(
        "greeting_instance_health",
        "service" => service.to_string(),
        "address" => address.to_string()
    )
    .set(if healthy { 1.0 } else { 0.0 });
}
