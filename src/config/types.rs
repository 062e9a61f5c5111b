//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::validation::{ConfigWarning, validate};
use crate::catalog::{self, AdminCatalog};
use crate::error::ValidationError;
use crate::registry::{AdminModule, PermissionMap};

/// Environment variable that forces dev mode on or off.
pub const ENV_DEV_MODE: &str = "ADMIN_REGISTRY_DEV_MODE";
/// Environment variable that forces strict permissions on or off.
pub const ENV_STRICT_PERMISSIONS: &str = "ADMIN_REGISTRY_STRICT_PERMISSIONS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid module catalog: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Registry-wide flags, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Grant every signed-in user access to every known module.
    pub dev_mode: bool,
    /// Keep normal role checks even when `dev_mode` is on.
    pub strict_permissions: bool,
}

impl RegistryConfig {
    pub fn new(dev_mode: bool, strict_permissions: bool) -> Self {
        Self {
            dev_mode,
            strict_permissions,
        }
    }

    /// Whether the development bypass applies.
    #[inline]
    pub fn dev_bypass_active(&self) -> bool {
        self.dev_mode && !self.strict_permissions
    }

    /// Override flags from [`ENV_DEV_MODE`] / [`ENV_STRICT_PERMISSIONS`].
    ///
    /// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`; anything else
    /// is ignored with a warning.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(value) = env_flag(ENV_DEV_MODE) {
            self.dev_mode = value;
        }
        if let Some(value) = env_flag(ENV_STRICT_PERMISSIONS) {
            self.strict_permissions = value;
        }
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        tracing::warn!(variable = name, value = %raw, "Ignoring unrecognized boolean value");
    }
    parsed
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Registry configuration file.
///
/// ```toml
/// [registry]
/// dev_mode = false
/// strict_permissions = true
///
/// [permissions]
/// admin = ["dashboard.view", "users.view"]
///
/// [[modules]]
/// id = "dashboard"
/// name = "Dashboard"
/// route = "/admin"
/// component = "Dashboard"
/// permissions = ["dashboard.view"]
/// enabled = true
/// order = 1
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Registry flags.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Role → permissions. Falls back to the built-in map when absent.
    pub permissions: Option<PermissionMap>,
    /// Default module catalog. Falls back to the built-in catalog when absent.
    pub modules: Option<Vec<AdminModule>>,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        for warning in config.validate()? {
            tracing::warn!(%warning, "Module catalog data-quality issue");
        }
        Ok(config)
    }

    /// Validate the catalog, returning data-quality warnings on success.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        match &self.modules {
            Some(modules) => validate(modules).map_err(ConfigError::Invalid),
            None => Ok(Vec::new()),
        }
    }

    /// The catalog snapshot `initialize`/`reset` reload from.
    pub fn catalog(&self) -> AdminCatalog {
        AdminCatalog {
            modules: self
                .modules
                .clone()
                .unwrap_or_else(catalog::default_modules),
            permissions: self
                .permissions
                .clone()
                .unwrap_or_else(catalog::default_permissions),
        }
    }
}
