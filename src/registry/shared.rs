//! Shared registry handle for hosts with concurrent request handlers.
//!
//! The registry performs no locking of its own. This wrapper serializes every
//! mutating call behind a write lock and lets reads proceed in parallel.

use super::{AdminModule, AdminModuleRegistry, NavNode, RequestingUser, Settings};
use crate::error::ValidationError;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<AdminModuleRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: AdminModuleRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Read access for queries that need more than one call to agree.
    pub fn read(&self) -> RwLockReadGuard<'_, AdminModuleRegistry> {
        self.inner.read()
    }

    /// Exclusive access for multi-step mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, AdminModuleRegistry> {
        self.inner.write()
    }

    pub fn initialize(&self) {
        self.inner.write().initialize();
    }

    pub fn reset(&self) {
        self.inner.write().reset();
    }

    pub fn register(&self, module: AdminModule) -> Result<(), ValidationError> {
        self.inner.write().register(module)
    }

    pub fn unregister(&self, id: &str) -> bool {
        self.inner.write().unregister(id)
    }

    pub fn set_module_enabled(&self, id: &str, enabled: bool) -> bool {
        self.inner.write().set_module_enabled(id, enabled)
    }

    pub fn update_module_settings(&self, id: &str, partial: Settings) -> bool {
        self.inner.write().update_module_settings(id, partial)
    }

    pub fn has_permission(&self, id: &str, user: Option<&RequestingUser>) -> bool {
        self.inner.read().has_permission(id, user)
    }

    pub fn navigation_for(&self, user: Option<&RequestingUser>) -> Vec<NavNode> {
        self.inner.read().get_navigation_structure(user)
    }
}

impl From<AdminModuleRegistry> for SharedRegistry {
    fn from(registry: AdminModuleRegistry) -> Self {
        Self::new(registry)
    }
}
