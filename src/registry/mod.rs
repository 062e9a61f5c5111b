//! Admin module registry.
//!
//! [`AdminModuleRegistry`] owns a [`ModuleStore`] and answers per-user
//! questions about it through the [`permissions`] guard chain. Mutations that
//! name an unknown id return `false`; only malformed modules are errors.

mod module;
mod navigation;
pub mod permissions;
mod shared;
mod store;
mod validation;

pub use module::{AdminModule, ModuleEntry, Settings};
pub use navigation::NavNode;
pub use permissions::{Decision, PermissionMap, RequestingUser, Role, RolePermissions};
pub use shared::SharedRegistry;
pub use store::ModuleStore;
pub use validation::{module_from_value, validate_module};

use crate::catalog::AdminCatalog;
use crate::config::{Config, RegistryConfig};
use crate::error::ValidationError;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A route used by more than one registered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConflict {
    pub route: String,
    pub ids: Vec<String>,
}

/// Process-local directory of admin modules.
#[derive(Debug, Clone)]
pub struct AdminModuleRegistry {
    store: ModuleStore,
    flags: RegistryConfig,
    catalog: AdminCatalog,
    initialized: bool,
}

impl AdminModuleRegistry {
    /// Create an empty registry backed by the built-in catalog.
    pub fn new(flags: RegistryConfig) -> Self {
        Self::with_catalog(flags, AdminCatalog::builtin())
    }

    /// Create an empty registry backed by `catalog`.
    pub fn with_catalog(flags: RegistryConfig, catalog: AdminCatalog) -> Self {
        Self {
            store: ModuleStore::new(),
            flags,
            catalog,
            initialized: false,
        }
    }

    /// Create an empty registry from a loaded configuration file.
    pub fn from_config(config: &Config) -> Self {
        Self::with_catalog(config.registry, config.catalog())
    }

    /// Load the default catalog. Repeated calls are no-ops.
    ///
    /// Catalog entries that fail validation are skipped with a warning.
    pub fn initialize(&mut self) {
        if self.initialized {
            debug!(modules = self.store.len(), "Admin module registry already initialized");
            return;
        }

        let mut skipped = 0usize;
        for module in self.catalog.modules.clone() {
            let id = module.id.clone();
            if let Err(e) = self.register(module) {
                skipped += 1;
                warn!(module = %id, error = %e, code = e.error_code(), "Skipping invalid catalog module");
            }
        }

        self.initialized = true;
        info!(
            roots = self.store.root_ids().len(),
            modules = self.store.len(),
            skipped,
            dev_mode = self.flags.dev_mode,
            strict_permissions = self.flags.strict_permissions,
            "Admin module registry initialized"
        );
    }

    /// Drop every runtime change and reload the default catalog.
    pub fn reset(&mut self) {
        let discarded = self.store.len();
        self.store.clear();
        self.initialized = false;
        info!(discarded, "Resetting admin module registry");
        self.initialize();
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn config(&self) -> &RegistryConfig {
        &self.flags
    }

    #[inline]
    pub fn catalog(&self) -> &AdminCatalog {
        &self.catalog
    }

    /// Validate and insert (or replace) a root module and its sub-modules.
    ///
    /// Nothing is mutated when validation fails.
    pub fn register(&mut self, module: AdminModule) -> Result<(), ValidationError> {
        validate_module(&module)?;

        for conflict in self.incoming_route_conflicts(&module) {
            warn!(
                route = %conflict.route,
                ids = ?conflict.ids,
                "Module route already in use"
            );
        }

        let id = module.id.clone();
        let replaced = self.store.has(&id);
        let subtree = module.subtree_ids().len();
        self.store.upsert(module, None);
        debug!(module = %id, replaced, subtree, "Registered admin module");
        Ok(())
    }

    /// Validate loosely typed JSON as a module, then register it.
    pub fn register_value(&mut self, value: &Value) -> Result<(), ValidationError> {
        let module = module_from_value(value)?;
        self.register(module)
    }

    /// Remove a module and all of its descendants.
    pub fn unregister(&mut self, id: &str) -> bool {
        let removed = self.store.remove(id);
        debug!(module = %id, removed, "Unregister admin module");
        removed
    }

    #[inline]
    pub fn has_module(&self, id: &str) -> bool {
        self.store.has(id)
    }

    #[inline]
    pub fn get_module(&self, id: &str) -> Option<&ModuleEntry> {
        self.store.get(id)
    }

    /// Every registered module, roots and descendants, depth-first.
    pub fn get_all_modules(&self) -> Vec<&ModuleEntry> {
        self.store.all_flat()
    }

    /// Enabled root modules sorted by `order`; ties keep registration order.
    pub fn get_enabled(&self) -> Vec<&ModuleEntry> {
        navigation::enabled_sorted(&self.store, self.store.root_ids())
    }

    /// Toggle a module's own `enabled` flag. Children are not touched.
    pub fn set_module_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.store.get_mut(id) {
            Some(entry) => {
                entry.enabled = enabled;
                debug!(module = %id, enabled, "Module enabled flag changed");
                true
            }
            None => false,
        }
    }

    /// Shallow-merge `partial` into a module's settings.
    pub fn update_module_settings<I>(&mut self, id: &str, partial: I) -> bool
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let Some(entry) = self.store.get_mut(id) else {
            return false;
        };
        let settings = entry.settings.get_or_insert_with(Settings::new);
        let mut keys = Vec::new();
        for (key, value) in partial {
            keys.push(key.clone());
            settings.insert(key, value);
        }
        debug!(module = %id, keys = ?keys, "Module settings updated");
        true
    }

    /// Whether `user` may access module `id`.
    pub fn has_permission(&self, id: &str, user: Option<&RequestingUser>) -> bool {
        permissions::has_permission(self.store.get(id), user, &self.flags, &self.catalog.permissions)
    }

    /// The deciding rule for `user` and module `id`.
    pub fn explain_permission(&self, id: &str, user: Option<&RequestingUser>) -> Decision {
        permissions::evaluate(self.store.get(id), user, &self.flags, &self.catalog.permissions)
    }

    /// Enabled root modules `user` may access, sorted by `order`.
    pub fn get_modules_for_user(&self, user: Option<&RequestingUser>) -> Vec<&ModuleEntry> {
        self.get_enabled()
            .into_iter()
            .filter(|entry| self.has_permission(&entry.id, user))
            .collect()
    }

    /// Filtered, sorted navigation tree for `user`.
    pub fn get_navigation_structure(&self, user: Option<&RequestingUser>) -> Vec<NavNode> {
        navigation::build_level(&self.store, self.store.root_ids(), &|entry: &ModuleEntry| {
            self.has_permission(&entry.id, user)
        })
    }

    /// First module with `route`, searching roots then descendants in stored order.
    pub fn get_module_by_route(&self, route: &str) -> Option<&ModuleEntry> {
        self.store.all_flat().into_iter().find(|entry| entry.route == route)
    }

    /// Child entries of `id` in stored order.
    pub fn children(&self, id: &str) -> Vec<&ModuleEntry> {
        self.store.children(id)
    }

    /// Ids from the root down to `id` (inclusive). Empty if `id` is unknown.
    pub fn breadcrumbs(&self, id: &str) -> Vec<&str> {
        let mut trail = Vec::new();
        let mut current = self.store.get(id);
        while let Some(entry) = current {
            trail.push(entry.id.as_str());
            current = entry.parent.as_deref().and_then(|parent| self.store.get(parent));
        }
        trail.reverse();
        trail
    }

    /// Owned nested copy of the module `id` and its current descendants.
    pub fn module_tree(&self, id: &str) -> Option<AdminModule> {
        self.store.materialize(id)
    }

    /// Routes shared by more than one registered module.
    pub fn route_conflicts(&self) -> Vec<RouteConflict> {
        let mut by_route: HashMap<&str, Vec<String>> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for entry in self.store.all_flat() {
            let ids = by_route.entry(entry.route.as_str()).or_insert_with(|| {
                order.push(entry.route.as_str());
                Vec::new()
            });
            ids.push(entry.id.clone());
        }
        order
            .into_iter()
            .filter_map(|route| {
                let ids = by_route.remove(route)?;
                (ids.len() > 1).then(|| RouteConflict {
                    route: route.to_string(),
                    ids,
                })
            })
            .collect()
    }

    /// Number of registered modules, including sub-modules.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Routes of `module`'s subtree already used by modules it will not replace.
    fn incoming_route_conflicts(&self, module: &AdminModule) -> Vec<RouteConflict> {
        let incoming = module.subtree_ids();
        let mut conflicts = Vec::new();
        let mut stack = vec![module];
        while let Some(current) = stack.pop() {
            let clashing: Vec<String> = self
                .store
                .all_flat()
                .into_iter()
                .filter(|entry| entry.route == current.route && !incoming.contains(&entry.id.as_str()))
                .map(|entry| entry.id.clone())
                .collect();
            if !clashing.is_empty() {
                let mut ids = clashing;
                ids.push(current.id.clone());
                conflicts.push(RouteConflict {
                    route: current.route.clone(),
                    ids,
                });
            }
            stack.extend(current.sub_modules.iter());
        }
        conflicts
    }
}

impl Default for AdminModuleRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
