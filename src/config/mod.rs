//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! On change (file watcher or SIGHUP):
//!     watcher.rs reloads and validates
//!     → new AppConfig sent to the running server
//!     → server swaps its snapshot atomically
//! ```
//!
//! Invalid reloads are logged and ignored; the previous snapshot keeps serving.

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, BackendSettings, DiscoveryConfig, FrontendSettings, HealthCheckConfig,
    ListenerConfig, ObservabilityConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
