//! Admin module value types.
//!
//! [`AdminModule`] is the owned, nested shape callers register and catalogs
//! declare. Once registered, a module lives in the store as a flat
//! [`ModuleEntry`] that refers to its children by id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form per-module settings, merged shallowly on update.
pub type Settings = Map<String, Value>;

/// A permission-gated administrative feature with optional nested sub-modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminModule {
    /// Identifier, unique across the whole tree.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Opaque icon reference for the UI layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Route, unique across the whole tree.
    pub route: String,
    /// Opaque component reference. Required for a module to be registrable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Access is granted when the viewer's role holds any of these.
    pub permissions: Vec<String>,
    /// Hard visibility switch.
    pub enabled: bool,
    /// Sort key among siblings.
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, alias = "sub_modules", skip_serializing_if = "Vec::is_empty")]
    pub sub_modules: Vec<AdminModule>,
}

impl AdminModule {
    /// Create an enabled module with no permissions, order 0 and no children.
    pub fn new(id: impl Into<String>, name: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            route: route.into(),
            component: None,
            permissions: Vec::new(),
            enabled: true,
            order: 0,
            settings: None,
            sub_modules: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set a single settings key, creating the settings object if absent.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings
            .get_or_insert_with(Settings::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_sub_module(mut self, child: AdminModule) -> Self {
        self.sub_modules.push(child);
        self
    }

    /// Ids of this module and every descendant, depth-first.
    pub fn subtree_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        for child in &self.sub_modules {
            ids.extend(child.subtree_ids());
        }
        ids
    }
}

/// A registered module as held by the store.
///
/// Children are referenced by id into the same store; use
/// [`AdminModuleRegistry::module_tree`](super::AdminModuleRegistry::module_tree)
/// to get an owned nested copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub permissions: Vec<String>,
    pub enabled: bool,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    /// Parent id, `None` for root modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Child ids in registration order.
    pub children: Vec<String>,
}

impl ModuleEntry {
    /// Split a nested module into its flat entry and its (still nested) children.
    pub(crate) fn split(module: AdminModule, parent: Option<String>) -> (Self, Vec<AdminModule>) {
        let AdminModule {
            id,
            name,
            icon,
            route,
            component,
            permissions,
            enabled,
            order,
            settings,
            sub_modules,
        } = module;

        let children = sub_modules.iter().map(|m| m.id.clone()).collect();
        let entry = Self {
            id,
            name,
            icon,
            route,
            component,
            permissions,
            enabled,
            order,
            settings,
            parent,
            children,
        };
        (entry, sub_modules)
    }

    /// Owned copy of this entry's own fields, without children.
    pub(crate) fn to_module(&self) -> AdminModule {
        AdminModule {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            route: self.route.clone(),
            component: self.component.clone(),
            permissions: self.permissions.clone(),
            enabled: self.enabled,
            order: self.order,
            settings: self.settings.clone(),
            sub_modules: Vec::new(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
