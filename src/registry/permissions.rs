//! Role resolution and the module access check.
//!
//! The role → permission vocabulary is injected through [`RolePermissions`];
//! nothing here knows which permission strings exist. [`evaluate`] is an
//! ordered guard chain:
//!
//! 1. unknown module → deny
//! 2. anonymous user → deny
//! 3. `super_admin` → grant
//! 4. dev mode without strict permissions → grant
//! 5. role permissions intersect module permissions → grant, else deny

use super::module::ModuleEntry;
use crate::config::RegistryConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Role of a requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Moderator,
    Admin,
    SuperAdmin,
    /// Any other role the host system defines.
    Custom(String),
}

impl Role {
    /// Canonical snake_case name, also the permission map key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
            Self::Custom(name) => name,
        }
    }

    #[inline]
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_role_key(s);
        Ok(match key.as_str() {
            "user" => Self::User,
            "moderator" => Self::Moderator,
            "admin" => Self::Admin,
            "super_admin" => Self::SuperAdmin,
            _ => Self::Custom(key),
        })
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(role) => role,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An already-authenticated user. Anonymous viewers are `None` at call sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestingUser {
    pub id: String,
    pub role: Role,
}

impl RequestingUser {
    pub fn new(id: impl Into<String>, role: impl Into<Role>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
        }
    }
}

/// Normalize a role name to snake_case: `superAdmin`, `Super-Admin` and
/// `super_admin` all become `super_admin`.
pub fn normalize_role_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    let mut prev_lower = false;
    for c in key.trim().chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Lookup from role name to the permission strings that role holds.
pub trait RolePermissions {
    /// Permissions for `role`; unknown roles hold none.
    fn permissions_for(&self, role: &str) -> &[String];
}

impl RolePermissions for HashMap<String, Vec<String>> {
    fn permissions_for(&self, role: &str) -> &[String] {
        self.get(role).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Role → permissions table with normalized role keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Vec<String>>", into = "HashMap<String, Vec<String>>")]
pub struct PermissionMap {
    roles: HashMap<String, Vec<String>>,
}

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add permissions to `role`, merging with anything already granted.
    pub fn grant<I, S>(&mut self, role: &str, permissions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let granted = self.roles.entry(normalize_role_key(role)).or_default();
        for permission in permissions {
            let permission = permission.into();
            if !granted.contains(&permission) {
                granted.push(permission);
            }
        }
    }

    pub fn with_role<I, S>(mut self, role: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant(role, permissions);
        self
    }

    /// Whether `role` holds `permission`.
    pub fn grants(&self, role: &str, permission: &str) -> bool {
        self.permissions_for(role).iter().any(|p| p == permission)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl RolePermissions for PermissionMap {
    fn permissions_for(&self, role: &str) -> &[String] {
        self.roles.permissions_for(role)
    }
}

impl From<HashMap<String, Vec<String>>> for PermissionMap {
    fn from(raw: HashMap<String, Vec<String>>) -> Self {
        let mut map = Self::new();
        for (role, permissions) in raw {
            map.grant(&role, permissions);
        }
        map
    }
}

impl From<PermissionMap> for HashMap<String, Vec<String>> {
    fn from(map: PermissionMap) -> Self {
        map.roles
    }
}

/// Which guard decided an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    UnknownModule,
    Anonymous,
    SuperAdmin,
    DevBypass,
    RoleGranted,
    RoleDenied,
}

impl Decision {
    #[inline]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::DevBypass | Self::RoleGranted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownModule => "unknown_module",
            Self::Anonymous => "anonymous",
            Self::SuperAdmin => "super_admin",
            Self::DevBypass => "dev_bypass",
            Self::RoleGranted => "role_granted",
            Self::RoleDenied => "role_denied",
        }
    }
}

/// Run the guard chain and report which rule decided.
pub fn evaluate(
    module: Option<&ModuleEntry>,
    user: Option<&RequestingUser>,
    flags: &RegistryConfig,
    roles: &impl RolePermissions,
) -> Decision {
    let Some(module) = module else {
        return Decision::UnknownModule;
    };
    let Some(user) = user else {
        return Decision::Anonymous;
    };
    if user.role.is_super_admin() {
        return Decision::SuperAdmin;
    }
    if flags.dev_bypass_active() {
        return Decision::DevBypass;
    }

    let held = roles.permissions_for(user.role.as_str());
    if module.permissions.iter().any(|required| held.contains(required)) {
        Decision::RoleGranted
    } else {
        Decision::RoleDenied
    }
}

/// Boolean access check with a trace record of the deciding rule.
pub fn has_permission(
    module: Option<&ModuleEntry>,
    user: Option<&RequestingUser>,
    flags: &RegistryConfig,
    roles: &impl RolePermissions,
) -> bool {
    let decision = evaluate(module, user, flags, roles);
    trace!(
        module = module.map(|m| m.id.as_str()),
        user = user.map(|u| u.id.as_str()),
        role = user.map(|u| u.role.as_str()),
        rule = decision.as_str(),
        granted = decision.is_granted(),
        "module access check"
    );
    decision.is_granted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::module::{AdminModule, ModuleEntry};

    fn entry(permissions: &[&str]) -> ModuleEntry {
        let module = AdminModule::new("m", "M", "/m")
            .with_component("M")
            .with_permissions(permissions.iter().copied());
        ModuleEntry::split(module, None).0
    }

    fn roles() -> PermissionMap {
        PermissionMap::new()
            .with_role("admin", ["users.view", "users.manage"])
            .with_role("moderator", ["users.view"])
    }

    fn flags(dev_mode: bool, strict_permissions: bool) -> RegistryConfig {
        RegistryConfig {
            dev_mode,
            strict_permissions,
        }
    }

    #[test]
    fn unknown_module_denied_even_in_dev_mode() {
        let admin = RequestingUser::new("1", Role::SuperAdmin);
        assert_eq!(
            evaluate(None, Some(&admin), &flags(true, false), &roles()),
            Decision::UnknownModule
        );
    }

    #[test]
    fn anonymous_denied_even_in_dev_mode() {
        let module = entry(&[]);
        assert_eq!(
            evaluate(Some(&module), None, &flags(true, false), &roles()),
            Decision::Anonymous
        );
    }

    #[test]
    fn super_admin_bypasses_permissions() {
        let module = entry(&["nobody.has.this"]);
        let user = RequestingUser::new("1", "super_admin");
        assert!(has_permission(Some(&module), Some(&user), &flags(false, true), &roles()));
    }

    #[test]
    fn dev_mode_grants_unless_strict() {
        let module = entry(&["users.manage"]);
        let user = RequestingUser::new("2", Role::User);
        assert_eq!(
            evaluate(Some(&module), Some(&user), &flags(true, false), &roles()),
            Decision::DevBypass
        );
        assert_eq!(
            evaluate(Some(&module), Some(&user), &flags(true, true), &roles()),
            Decision::RoleDenied
        );
    }

    #[test]
    fn any_match_policy() {
        let module = entry(&["users.manage", "users.view"]);
        let moderator = RequestingUser::new("3", Role::Moderator);
        assert!(has_permission(Some(&module), Some(&moderator), &flags(false, false), &roles()));

        let admin_only = entry(&["users.manage"]);
        assert!(!has_permission(Some(&admin_only), Some(&moderator), &flags(false, false), &roles()));
    }

    #[test]
    fn empty_module_permissions_deny_normal_roles() {
        let module = entry(&[]);
        let admin = RequestingUser::new("4", Role::Admin);
        assert!(!has_permission(Some(&module), Some(&admin), &flags(false, false), &roles()));
    }

    #[test]
    fn unknown_role_holds_nothing() {
        let module = entry(&["users.view"]);
        let guest = RequestingUser::new("5", "guest");
        assert_eq!(guest.role, Role::Custom("guest".into()));
        assert!(!has_permission(Some(&module), Some(&guest), &flags(false, false), &roles()));
    }

    #[test]
    fn role_keys_normalize() {
        assert_eq!(normalize_role_key("superAdmin"), "super_admin");
        assert_eq!(normalize_role_key("Super-Admin"), "super_admin");
        assert_eq!(normalize_role_key("super_admin"), "super_admin");
        assert_eq!(normalize_role_key("moderator"), "moderator");
        assert_eq!(Role::from("superAdmin"), Role::SuperAdmin);
    }

    #[test]
    fn permission_map_merges_aliases() {
        let mut raw = HashMap::new();
        raw.insert("superAdmin".to_string(), vec!["a".to_string()]);
        raw.insert("super_admin".to_string(), vec!["a".to_string(), "b".to_string()]);
        let map = PermissionMap::from(raw);

        assert_eq!(map.len(), 1);
        assert_eq!(map.permissions_for("super_admin").len(), 2);
        assert!(map.grants("super_admin", "b"));
    }

    #[test]
    fn role_serializes_as_string() {
        let user = RequestingUser::new("7", Role::SuperAdmin);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "super_admin");

        let back: RequestingUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }
}
