//! Observability subsystem.
//!
//! ```text
//! All subsystems produce:
//!     → logging.rs (tracing events, text or JSON)
//!     → metrics.rs (counters and gauges, Prometheus scrape endpoint)
//! ```
//!
//! The request id set by the HTTP layer is attached to frontend log events
//! and forwarded to the backend.

pub mod logging;
pub mod metrics;
