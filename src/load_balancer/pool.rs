//! Service instance pools.
//!
//! # Responsibilities
//! - Group instances by logical service name
//! - Apply the load balancing algorithm per service
//! - Allow the whole table to be replaced on configuration reload

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::DiscoveryConfig;
use crate::load_balancer::{instance::Instance, round_robin::RoundRobin, LoadBalancer};

#[derive(Debug)]
struct ServiceGroup {
    instances: Vec<Arc<Instance>>,
    balancer: Box<dyn LoadBalancer>,
}

/// An immutable table of services and their instances.
#[derive(Debug, Default)]
pub struct ServicePool {
    services: HashMap<String, ServiceGroup>,
}

impl ServicePool {
    /// Build the table from configuration. Unparsable addresses are skipped.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let mut services = HashMap::new();

        for (name, addresses) in &config.services {
            let instances: Vec<Arc<Instance>> = addresses
                .iter()
                .filter_map(|address| match address.parse() {
                    Ok(addr) => Some(Arc::new(Instance::new(name.clone(), addr))),
                    Err(_) => {
                        tracing::warn!(service = %name, address = %address, "Invalid instance address");
                        None
                    }
                })
                .collect();

            tracing::debug!(service = %name, instances = instances.len(), "Registered service");
            services.insert(
                name.clone(),
                ServiceGroup {
                    instances,
                    balancer: Box::new(RoundRobin::with_random_start()),
                },
            );
        }

        Self { services }
    }

    /// Whether `name` is a registered logical service.
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Pick the instance for the next call to `name`.
    pub fn select(&self, name: &str) -> Option<Arc<Instance>> {
        let group = self.services.get(name)?;
        let selected = group.balancer.next_instance(&group.instances);
        if selected.is_none() {
            tracing::debug!(service = %name, "No instances registered for service");
        }
        selected
    }

    /// Every instance of every service (for health checking).
    pub fn all_instances(&self) -> Vec<Arc<Instance>> {
        self.services
            .values()
            .flat_map(|group| group.instances.iter())
            .cloned()
            .collect()
    }
}

/// Shared, atomically replaceable [`ServicePool`].
#[derive(Debug)]
pub struct ServiceRegistry {
    pool: ArcSwap<ServicePool>,
}

impl ServiceRegistry {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            pool: ArcSwap::from_pointee(ServicePool::from_config(config)),
        }
    }

    /// Current snapshot of the table.
    pub fn pool(&self) -> Arc<ServicePool> {
        self.pool.load_full()
    }

    /// Replace the table. Health state of the old instances is discarded.
    pub fn replace(&self, config: &DiscoveryConfig) {
        self.pool.store(Arc::new(ServicePool::from_config(config)));
        tracing::info!(services = config.services.len(), "Service registry updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery(entries: &[(&str, &[&str])]) -> DiscoveryConfig {
        DiscoveryConfig {
            services: entries
                .iter()
                .map(|(name, addrs)| {
                    (name.to_string(), addrs.iter().map(|a| a.to_string()).collect())
                })
                .collect(),
        }
    }

    #[test]
    fn test_select_rotates_within_service() {
        let pool = ServicePool::from_config(&discovery(&[(
            "backend",
            &["127.0.0.1:9001", "127.0.0.1:9002"][..],
        )]));

        let first = pool.select("backend").unwrap().addr;
        let second = pool.select("backend").unwrap().addr;
        assert_ne!(first, second);
        assert_eq!(pool.select("backend").unwrap().addr, first);
    }

    #[test]
    fn test_unknown_and_empty_services() {
        let pool = ServicePool::from_config(&discovery(&[("backend", &["not-an-address"][..])]));
        assert!(pool.contains("backend"));
        assert!(pool.select("backend").is_none());
        assert!(!pool.contains("other"));
        assert!(pool.select("other").is_none());
    }

    #[test]
    fn test_registry_replace() {
        let registry = ServiceRegistry::new(&DiscoveryConfig::default());
        assert!(!registry.pool().contains("backend"));

        registry.replace(&discovery(&[("backend", &["127.0.0.1:9001"][..])]));
        assert_eq!(registry.pool().all_instances().len(), 1);
    }
}
