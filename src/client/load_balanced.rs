//! Load-balanced HTTP client for the backend service.
//!
//! # Responsibilities
//! - Resolve the logical backend address through the [`ServiceRegistry`]
//! - Issue a single GET with connect and total timeouts
//! - Decode the [`Greeting`] and classify every failure
//! - Feed call outcomes back into instance health (passive checks)

use std::sync::Arc;

use arc_swap::ArcSwap;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use url::Url;

use crate::client::{ClientError, GreetingClient};
use crate::config::AppConfig;
use crate::greeting::Greeting;
use crate::http::request::X_REQUEST_ID;
use crate::load_balancer::instance::Instance;
use crate::load_balancer::ServiceRegistry;

/// Per-configuration part of the client, swapped on reload.
#[derive(Debug)]
struct ClientSettings {
    http: reqwest::Client,
    address: Url,
    healthy_threshold: usize,
    unhealthy_threshold: usize,
}

impl ClientSettings {
    fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let address = Url::parse(&config.frontend.backend_address)
            .map_err(|_| ClientError::InvalidAddress(config.frontend.backend_address.clone()))?;

        // Instances come from discovery, never from a system proxy.
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeouts.connect())
            .timeout(config.timeouts.request())
            .no_proxy()
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            address,
            healthy_threshold: config.health_check.healthy_threshold as usize,
            unhealthy_threshold: config.health_check.unhealthy_threshold as usize,
        })
    }
}

/// Fetches greetings from one instance of the backend service per call.
#[derive(Debug)]
pub struct LoadBalancedGreetingClient {
    registry: Arc<ServiceRegistry>,
    settings: ArcSwap<ClientSettings>,
}

impl LoadBalancedGreetingClient {
    pub fn new(config: &AppConfig, registry: Arc<ServiceRegistry>) -> Result<Self, ClientError> {
        Ok(Self {
            registry,
            settings: ArcSwap::from_pointee(ClientSettings::from_config(config)?),
        })
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// The logical address calls are made against.
    pub fn address(&self) -> Url {
        self.settings.load().address.clone()
    }

    /// Apply a new configuration. On error the previous settings stay.
    pub fn reload(&self, config: &AppConfig) -> Result<(), ClientError> {
        let settings = ClientSettings::from_config(config)?;
        self.settings.store(Arc::new(settings));
        self.registry.replace(&config.discovery);
        Ok(())
    }

    /// Turn the logical address into a concrete URL.
    ///
    /// If the host is a registered service it is replaced by the address of
    /// the selected instance; otherwise the URL is used as configured.
    fn resolve(&self, address: &Url) -> Result<(Url, Option<Arc<Instance>>), ClientError> {
        let invalid = || ClientError::InvalidAddress(address.to_string());
        let service = address.host_str().ok_or_else(invalid)?;

        let pool = self.registry.pool();
        if !pool.contains(service) {
            return Ok((address.clone(), None));
        }

        let instance = pool
            .select(service)
            .ok_or_else(|| ClientError::NoInstances(service.to_string()))?;

        let mut url = address.clone();
        url.set_ip_host(instance.addr.ip()).map_err(|_| invalid())?;
        url.set_port(Some(instance.addr.port())).map_err(|_| invalid())?;
        Ok((url, Some(instance)))
    }

    async fn get(&self, request_id: Option<String>) -> Result<Greeting, ClientError> {
        let settings = self.settings.load_full();
        let (url, instance) = self.resolve(&settings.address)?;

        tracing::debug!(url = %url, "Calling backend instance");

        let outcome = Self::send(&settings.http, &url, request_id).await;

        if let Some(instance) = instance {
            match &outcome {
                Err(e) if e.is_instance_failure() => {
                    instance.mark_failure(settings.unhealthy_threshold)
                }
                _ => instance.mark_success(settings.healthy_threshold),
            }
        }

        outcome
    }

    async fn send(
        http: &reqwest::Client,
        url: &Url,
        request_id: Option<String>,
    ) -> Result<Greeting, ClientError> {
        let mut request = http.get(url.clone());
        if let Some(id) = request_id {
            request = request.header(X_REQUEST_ID, id);
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                ClientError::Timeout { url: url.to_string() }
            } else {
                ClientError::Transport {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Greeting>().await.map_err(|source| {
            if source.is_timeout() {
                ClientError::Timeout { url: url.to_string() }
            } else {
                ClientError::Decode {
                    url: url.to_string(),
                    source,
                }
            }
        })
    }
}

impl GreetingClient for LoadBalancedGreetingClient {
    fn fetch(&self, request_id: Option<String>) -> BoxFuture<'_, Result<Greeting, ClientError>> {
        self.get(request_id).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(address: &str, instances: &[&str]) -> AppConfig {
        let mut config = AppConfig::default();
        config.frontend.backend_address = address.to_string();
        if !instances.is_empty() {
            config.discovery.services.insert(
                "backend".into(),
                instances.iter().map(|i| i.to_string()).collect(),
            );
        }
        config
    }

    fn client(config: &AppConfig) -> LoadBalancedGreetingClient {
        let registry = Arc::new(ServiceRegistry::new(&config.discovery));
        LoadBalancedGreetingClient::new(config, registry).unwrap()
    }

    #[test]
    fn test_resolves_registered_service() {
        let config = config("http://backend/api", &["10.1.2.3:8080"]);
        let client = client(&config);

        let (url, instance) = client.resolve(&client.address()).unwrap();
        assert_eq!(url.as_str(), "http://10.1.2.3:8080/api");
        assert_eq!(instance.unwrap().addr, "10.1.2.3:8080".parse().unwrap());
    }

    #[test]
    fn test_unregistered_host_is_used_directly() {
        let config = config("http://backend.default.svc:8080/", &[]);
        let client = client(&config);

        let (url, instance) = client.resolve(&client.address()).unwrap();
        assert_eq!(url.as_str(), "http://backend.default.svc:8080/");
        assert!(instance.is_none());
    }

    #[test]
    fn test_registered_service_without_instances() {
        let mut config = config("http://backend/", &[]);
        config.discovery.services.insert("backend".into(), Vec::new());
        let client = client(&config);

        let err = client.resolve(&client.address()).unwrap_err();
        assert!(matches!(err, ClientError::NoInstances(name) if name == "backend"));
    }

    #[test]
    fn test_reload_switches_target() {
        let client = client(&config("http://backend/", &["10.0.0.1:80"]));

        client
            .reload(&config("http://other/", &[]))
            .unwrap();
        assert_eq!(client.address().as_str(), "http://other/");
        assert!(!client.registry().pool().contains("backend"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_instance_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let mut config = config("http://backend/", &[addr.as_str()]);
        config.health_check.unhealthy_threshold = 1;
        let client = client(&config);

        let err = client.fetch(None).await.unwrap_err();
        assert!(err.is_instance_failure(), "unexpected error: {err}");
        assert!(!client.registry().pool().all_instances()[0].is_healthy());
    }
}
