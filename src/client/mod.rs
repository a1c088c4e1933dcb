//! Outbound greeting calls.
//!
//! # Data Flow
//! ```text
//! frontend handler
//!     → fallback.rs WithFallback::call()
//!         → load_balanced.rs (resolve instance, GET, decode)
//!         → on any ClientError: StaticFallback greeting
//!     → Served::Backend | Served::Fallback
//! ```
//!
//! A single attempt is made per incoming request. Timeouts come from the
//! HTTP client configuration and count as failures.

pub mod error;
pub mod fallback;
pub mod load_balanced;

use futures_util::future::BoxFuture;

use crate::greeting::Greeting;

pub use error::ClientError;
pub use fallback::{Fallback, Served, StaticFallback, WithFallback};
pub use load_balanced::LoadBalancedGreetingClient;

/// Something that can fetch a greeting, possibly over the network.
pub trait GreetingClient: Send + Sync {
    /// Fetch one greeting. `request_id` is forwarded for correlation.
    fn fetch(&self, request_id: Option<String>) -> BoxFuture<'_, Result<Greeting, ClientError>>;
}
