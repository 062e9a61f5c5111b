//! Integration test common fixtures.
//!
//! Users for each built-in role and helpers for building registries and
//! plugin modules.

#![allow(dead_code)]

use admin_registry::{
    AdminModule, AdminModuleRegistry, ModuleEntry, NavNode, RegistryConfig, RequestingUser, Role,
};

pub fn super_admin() -> RequestingUser {
    RequestingUser::new("1", Role::SuperAdmin)
}

pub fn admin() -> RequestingUser {
    RequestingUser::new("2", Role::Admin)
}

pub fn moderator() -> RequestingUser {
    RequestingUser::new("3", Role::Moderator)
}

pub fn plain_user() -> RequestingUser {
    RequestingUser::new("4", Role::User)
}

/// Registry over the built-in catalog, already initialized.
pub fn registry(dev_mode: bool, strict_permissions: bool) -> AdminModuleRegistry {
    let mut registry = AdminModuleRegistry::new(RegistryConfig::new(dev_mode, strict_permissions));
    registry.initialize();
    registry
}

pub fn production_registry() -> AdminModuleRegistry {
    registry(false, true)
}

/// A structurally valid plugin module.
pub fn plugin_module(id: &str) -> AdminModule {
    AdminModule::new(id, format!("{id} plugin"), format!("/admin/plugins/{id}"))
        .with_icon("puzzle")
        .with_component(format!("{id}Panel"))
        .with_permissions(["dashboard.view"])
        .with_order(20)
}

pub fn entry_ids<'a>(entries: &[&'a ModuleEntry]) -> Vec<&'a str> {
    entries.iter().map(|entry| entry.id.as_str()).collect()
}

pub fn nav_ids(nodes: &[NavNode]) -> Vec<&str> {
    nodes.iter().map(|node| node.id.as_str()).collect()
}
