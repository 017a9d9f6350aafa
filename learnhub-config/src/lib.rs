//! Configuration for LearnHub.
//!
//! Values are layered: process environment (optionally seeded from a `.env`
//! file) over a TOML file over built-in defaults. The loader then runs guard
//! rails that either reject the configuration or attach warnings.

pub mod constants;
pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    AuthConfig, Config, ConfigMetadata, DatabaseConfig, LocalStateConfig,
    RateLimitsConfig, RestConfig, SearchConfig, SessionConfig, StoreBackend,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
