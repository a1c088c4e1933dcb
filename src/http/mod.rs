//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request id assigned / propagated)
//!     → backend.rs  GET / → JSON Greeting
//!       frontend.rs GET / → client::WithFallback → render.rs → HTML
//!     → health.rs  GET /healthz, GET /readyz
//! ```

pub mod backend;
pub mod frontend;
pub mod health;
pub mod render;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
