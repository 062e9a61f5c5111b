//! admin-registry - permission-gated directory of administrative modules.
//!
//! Modules form a tree (module → ordered sub-modules). The registry answers,
//! for one already-authenticated user, which modules are visible and what the
//! navigation menu looks like.
//!
//! ```
//! use admin_registry::{AdminModuleRegistry, RegistryConfig, RequestingUser, Role};
//!
//! let mut registry = AdminModuleRegistry::new(RegistryConfig::default());
//! registry.initialize();
//!
//! let admin = RequestingUser::new("42", Role::Admin);
//! assert!(!registry.get_navigation_structure(Some(&admin)).is_empty());
//! assert!(registry.get_modules_for_user(None).is_empty());
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;

pub use catalog::AdminCatalog;
pub use config::{Config, ConfigError, RegistryConfig};
pub use error::ValidationError;
pub use registry::{
    AdminModule, AdminModuleRegistry, Decision, ModuleEntry, NavNode, PermissionMap,
    RequestingUser, Role, RolePermissions, RouteConflict, SharedRegistry,
};
