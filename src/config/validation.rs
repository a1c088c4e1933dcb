//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that deserialize fine
//! but cannot work at runtime. Every problem is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("frontend.backend_address `{0}` is not an absolute http(s) URL")]
    BackendAddress(String),

    #[error("discovery.services.{service}: `{address}` is not a socket address")]
    InstanceAddress { service: String, address: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error(
        "timeouts.request_ms ({request_ms}) must be shorter than timeouts.server_secs ({server_secs}s)"
    )]
    RequestTimeout { request_ms: u64, server_secs: u64 },
}

/// Check a configuration, returning every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let backend_ok = Url::parse(&config.frontend.backend_address)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false);
    if !backend_ok {
        errors.push(ValidationError::BackendAddress(
            config.frontend.backend_address.clone(),
        ));
    }

    for (service, addresses) in &config.discovery.services {
        for address in addresses {
            if address.parse::<SocketAddr>().is_err() {
                errors.push(ValidationError::InstanceAddress {
                    service: service.clone(),
                    address: address.clone(),
                });
            }
        }
    }

    let positives = [
        ("timeouts.connect_ms", config.timeouts.connect_ms),
        ("timeouts.request_ms", config.timeouts.request_ms),
        ("timeouts.server_secs", config.timeouts.server_secs),
        ("health_check.interval_secs", config.health_check.interval_secs),
        ("health_check.timeout_secs", config.health_check.timeout_secs),
        ("health_check.unhealthy_threshold", config.health_check.unhealthy_threshold.into()),
        ("health_check.healthy_threshold", config.health_check.healthy_threshold.into()),
    ];
    for (field, value) in positives {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    // The server timeout wraps the frontend's backend call; it must never fire first.
    let timeouts = &config.timeouts;
    if timeouts.request_ms > 0
        && timeouts.server_secs > 0
        && timeouts.request_ms >= timeouts.server_secs.saturating_mul(1_000)
    {
        errors.push(ValidationError::RequestTimeout {
            request_ms: timeouts.request_ms,
            server_secs: timeouts.server_secs,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
