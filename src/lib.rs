//! Hello cluster: a greeting backend and a frontend that calls it through a
//! client-side load balancer, degrading to a static fallback greeting when
//! the backend is unavailable.
//!
//! ```text
//!   client ──GET /──▶ frontend ──(discovery + round robin)──GET /──▶ backend
//!                        │                                         │
//!                        │◀──────────── {"message","source"} ◀─────┘
//!                        │
//!                        └─ on failure: StaticFallback greeting
//! ```

// Core
pub mod client;
pub mod config;
pub mod greeting;
pub mod http;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use greeting::Greeting;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
