//! Client-side service discovery and load balancing.
//!
//! # Data Flow
//! ```text
//! Logical URL (http://backend/)
//!     → pool.rs (look up instances registered for "backend")
//!     → round_robin.rs (rotate through healthy instances)
//!     → instance.rs (address + health state)
//!     → concrete URL (http://10.0.0.4:8080/)
//! ```
//!
//! The registry is a static table from configuration, swapped as a whole
//! when the configuration reloads.

pub mod instance;
pub mod pool;
pub mod round_robin;

use std::sync::Arc;

use crate::load_balancer::instance::Instance;

pub use instance::HealthState;
pub use pool::{ServicePool, ServiceRegistry};

/// Strategy that picks the instance for the next call.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    fn next_instance(&self, instances: &[Arc<Instance>]) -> Option<Arc<Instance>>;
}
