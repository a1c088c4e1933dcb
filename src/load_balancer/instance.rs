//! A single service instance and its health state.
//!
//! Health uses hysteresis: an instance flips to Unhealthy only after
//! `unhealthy_threshold` consecutive failures and back to Healthy after
//! `healthy_threshold` consecutive successes.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Health State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

/// One live address of a logical service.
#[derive(Debug)]
pub struct Instance {
    /// Logical service this instance belongs to.
    pub service: String,
    /// The address of the instance.
    pub addr: SocketAddr,

    state: AtomicU8,
    consecutive_failures: AtomicUsize,
    consecutive_successes: AtomicUsize,
}

impl Instance {
    pub fn new(service: impl Into<String>, addr: SocketAddr) -> Self {
        Self {
            service: service.into(),
            addr,
            state: AtomicU8::new(HealthState::Unknown as u8),
            consecutive_failures: AtomicUsize::new(0),
            consecutive_successes: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> HealthState {
        self.state.load(Ordering::Relaxed).into()
    }

    /// Healthy or not yet probed.
    pub fn is_healthy(&self) -> bool {
        self.state() != HealthState::Unhealthy
    }

    /// Report a successful call or probe.
    pub fn mark_success(&self, healthy_threshold: usize) {
        self.consecutive_failures.store(0, Ordering::Relaxed);

        if self.state() == HealthState::Healthy {
            return;
        }

        let successes = self.consecutive_successes.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= healthy_threshold {
            let previous = self.state.swap(HealthState::Healthy as u8, Ordering::Relaxed);
            self.consecutive_successes.store(0, Ordering::Relaxed);
            if HealthState::from(previous) == HealthState::Unhealthy {
                tracing::info!(service = %self.service, addr = %self.addr, "Instance is healthy again");
            }
        }
    }

    /// Report a failed call or probe.
    pub fn mark_failure(&self, unhealthy_threshold: usize) {
        self.consecutive_successes.store(0, Ordering::Relaxed);

        if self.state() == HealthState::Unhealthy {
            return;
        }

        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= unhealthy_threshold {
            self.state.store(HealthState::Unhealthy as u8, Ordering::Relaxed);
            self.consecutive_failures.store(0, Ordering::Relaxed);
            tracing::warn!(
                service = %self.service,
                addr = %self.addr,
                failures,
                "Instance marked unhealthy"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance::new("backend", "127.0.0.1:8080".parse().unwrap())
    }

    #[test]
    fn test_unknown_counts_as_healthy() {
        let i = instance();
        assert_eq!(i.state(), HealthState::Unknown);
        assert!(i.is_healthy());
    }

    #[test]
    fn test_failure_threshold() {
        let i = instance();
        i.mark_failure(3);
        i.mark_failure(3);
        assert!(i.is_healthy());
        i.mark_failure(3);
        assert_eq!(i.state(), HealthState::Unhealthy);
    }

    #[test]
    fn test_success_resets_failure_streak() {
        let i = instance();
        i.mark_failure(2);
        i.mark_success(1);
        i.mark_failure(2);
        assert!(i.is_healthy());
    }

    #[test]
    fn test_recovery_needs_consecutive_successes() {
        let i = instance();
        i.mark_failure(1);
        assert_eq!(i.state(), HealthState::Unhealthy);

        i.mark_success(2);
        assert_eq!(i.state(), HealthState::Unhealthy);
        i.mark_failure(1);
        i.mark_success(2);
        assert_eq!(i.state(), HealthState::Unhealthy);
        i.mark_success(2);
        assert_eq!(i.state(), HealthState::Healthy);
    }
}
