//! Instance health checking.
//!
//! ```text
//! Active (active.rs):
//!     Periodic timer → probe each instance → Instance::mark_success/failure
//!
//! Passive (client::load_balanced):
//!     Call outcome → Instance::mark_success/failure
//! ```
//!
//! Both paths feed the same hysteresis counters on
//! [`Instance`](crate::load_balancer::instance::Instance).

pub mod active;

pub use active::HealthMonitor;
