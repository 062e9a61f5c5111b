//! Configuration loading and management.
//!
//! - [`types`]: `Config`, `RegistryConfig`, `ConfigError` and TOML loading
//! - [`validation`]: catalog-wide checks (duplicate ids, shared routes)

mod types;
mod validation;

pub use types::{Config, ConfigError, ENV_DEV_MODE, ENV_STRICT_PERMISSIONS, RegistryConfig};
pub use validation::{ConfigWarning, validate};
