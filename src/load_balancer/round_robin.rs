//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::{instance::Instance, LoadBalancer};

/// Round-robin selector.
/// Stores an internal counter to rotate through instances.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the rotation at a random offset so that freshly started
    /// replicas do not all hit the first instance.
    pub fn with_random_start() -> Self {
        Self {
            counter: AtomicUsize::new(fastrand::usize(..)),
        }
    }
}

impl LoadBalancer for RoundRobin {
    fn next_instance(&self, instances: &[Arc<Instance>]) -> Option<Arc<Instance>> {
        if instances.is_empty() {
            return None;
        }

        let start = self.counter.fetch_add(1, Ordering::Relaxed);
        let len = instances.len();

        for i in 0..len {
            let candidate = &instances[start.wrapping_add(i) % len];
            if candidate.is_healthy() {
                return Some(candidate.clone());
            }
        }

        // All unhealthy: keep rotating over everything so that passive
        // checks get a chance to observe a recovery.
        Some(instances[start % len].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instances() -> Vec<Arc<Instance>> {
        vec![
            Arc::new(Instance::new("backend", "127.0.0.1:8080".parse().unwrap())),
            Arc::new(Instance::new("backend", "127.0.0.1:8081".parse().unwrap())),
        ]
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let all = instances();

        assert_eq!(lb.next_instance(&all).unwrap().addr, all[0].addr);
        assert_eq!(lb.next_instance(&all).unwrap().addr, all[1].addr);
        assert_eq!(lb.next_instance(&all).unwrap().addr, all[0].addr);
    }

    #[test]
    fn test_skips_unhealthy() {
        let lb = RoundRobin::new();
        let all = instances();
        all[0].mark_failure(1);

        for _ in 0..4 {
            assert_eq!(lb.next_instance(&all).unwrap().addr, all[1].addr);
        }
    }

    #[test]
    fn test_all_unhealthy_still_rotates() {
        let lb = RoundRobin::new();
        let all = instances();
        all[0].mark_failure(1);
        all[1].mark_failure(1);

        assert_eq!(lb.next_instance(&all).unwrap().addr, all[0].addr);
        assert_eq!(lb.next_instance(&all).unwrap().addr, all[1].addr);
    }

    #[test]
    fn test_empty() {
        assert!(RoundRobin::with_random_start().next_instance(&[]).is_none());
    }
}
