//! Built-in module catalog and role permission map.
//!
//! This is the snapshot `initialize()` and `reset()` reload from when no
//! configuration file overrides it.

use crate::registry::{AdminModule, PermissionMap};

/// Permission strings used by the built-in catalog.
pub mod permission {
    pub const DASHBOARD_VIEW: &str = "dashboard.view";
    pub const USERS_VIEW: &str = "users.view";
    pub const USERS_MANAGE: &str = "users.manage";
    pub const MODERATION_BANS: &str = "moderation.bans";
    pub const XP_MANAGE: &str = "xp.manage";
    pub const FORUM_MODERATE: &str = "forum.moderate";
    pub const FORUM_MANAGE: &str = "forum.manage";
    pub const CONTENT_MODERATE: &str = "content.moderate";
    pub const WALLET_VIEW: &str = "wallet.view";
    pub const WALLET_MANAGE: &str = "wallet.manage";
    pub const ANALYTICS_VIEW: &str = "analytics.view";
    pub const SYSTEM_SETTINGS: &str = "system.settings";
    pub const SYSTEM_PLUGINS: &str = "system.plugins";

    pub const ALL: &[&str] = &[
        DASHBOARD_VIEW,
        USERS_VIEW,
        USERS_MANAGE,
        MODERATION_BANS,
        XP_MANAGE,
        FORUM_MODERATE,
        FORUM_MANAGE,
        CONTENT_MODERATE,
        WALLET_VIEW,
        WALLET_MANAGE,
        ANALYTICS_VIEW,
        SYSTEM_SETTINGS,
        SYSTEM_PLUGINS,
    ];
}

use permission::*;

/// Module catalog plus the role permission map it is evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCatalog {
    pub modules: Vec<AdminModule>,
    pub permissions: PermissionMap,
}

impl AdminCatalog {
    pub fn builtin() -> Self {
        Self {
            modules: default_modules(),
            permissions: default_permissions(),
        }
    }

    /// Catalog with no modules and no role grants.
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
            permissions: PermissionMap::new(),
        }
    }
}

impl Default for AdminCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn module(id: &str, name: &str, icon: &str, route: &str, component: &str) -> AdminModule {
    AdminModule::new(id, name, route)
        .with_icon(icon)
        .with_component(component)
}

/// The default module tree.
pub fn default_modules() -> Vec<AdminModule> {
    vec![
        module("dashboard", "Dashboard", "layout-dashboard", "/admin", "AdminDashboard")
            .with_permissions([DASHBOARD_VIEW])
            .with_order(1),
        module("users", "User Management", "users", "/admin/users", "UserManagement")
            .with_permissions([USERS_VIEW, USERS_MANAGE])
            .with_order(2)
            .with_sub_module(
                module("users-list", "All Users", "list", "/admin/users/list", "UserList")
                    .with_permissions([USERS_VIEW])
                    .with_order(1),
            )
            .with_sub_module(
                module("users-roles", "Roles", "shield", "/admin/users/roles", "UserRoles")
                    .with_permissions([USERS_MANAGE])
                    .with_order(2),
            )
            .with_sub_module(
                module("users-bans", "Bans", "ban", "/admin/users/bans", "UserBans")
                    .with_permissions([USERS_MANAGE, MODERATION_BANS])
                    .with_order(3),
            ),
        module("xp-system", "XP System", "trophy", "/admin/xp", "XpSystem")
            .with_permissions([XP_MANAGE])
            .with_order(3)
            .with_setting("maxLevel", 100)
            .with_setting("baseXp", 100)
            .with_setting("multiplier", 1.5)
            .with_sub_module(
                module("xp-levels", "Levels", "bar-chart", "/admin/xp/levels", "XpLevels")
                    .with_permissions([XP_MANAGE])
                    .with_order(1),
            )
            .with_sub_module(
                module("xp-rewards", "Rewards", "gift", "/admin/xp/rewards", "XpRewards")
                    .with_permissions([XP_MANAGE])
                    .with_order(2),
            ),
        module("forum", "Forum", "messages-square", "/admin/forum", "ForumAdmin")
            .with_permissions([FORUM_MODERATE, FORUM_MANAGE])
            .with_order(4)
            .with_sub_module(
                module("forum-categories", "Categories", "folder", "/admin/forum/categories", "ForumCategories")
                    .with_permissions([FORUM_MANAGE])
                    .with_order(1),
            )
            .with_sub_module(
                module("forum-reports", "Reports", "flag", "/admin/forum/reports", "ForumReports")
                    .with_permissions([FORUM_MODERATE])
                    .with_order(2),
            ),
        module("content-moderation", "Content Moderation", "shield-check", "/admin/moderation", "ContentModeration")
            .with_permissions([CONTENT_MODERATE])
            .with_order(5),
        module("wallet", "Wallet", "wallet", "/admin/wallet", "WalletAdmin")
            .with_permissions([WALLET_VIEW, WALLET_MANAGE])
            .with_order(6)
            .with_sub_module(
                module("wallet-transactions", "Transactions", "receipt", "/admin/wallet/transactions", "WalletTransactions")
                    .with_permissions([WALLET_VIEW])
                    .with_order(1),
            ),
        module("analytics", "Analytics", "line-chart", "/admin/analytics", "Analytics")
            .with_permissions([ANALYTICS_VIEW])
            .with_order(7),
        module("system-settings", "System Settings", "settings", "/admin/settings", "SystemSettings")
            .with_permissions([SYSTEM_SETTINGS])
            .with_order(8)
            .with_setting("maintenanceMode", false),
        module("plugins", "Plugins", "puzzle", "/admin/plugins", "PluginManager")
            .with_permissions([SYSTEM_PLUGINS])
            .with_order(9)
            .with_enabled(false),
    ]
}

/// The default role → permission map. Plain users hold nothing.
pub fn default_permissions() -> PermissionMap {
    PermissionMap::new()
        .with_role("superAdmin", ALL.iter().copied())
        .with_role(
            "admin",
            [
                DASHBOARD_VIEW,
                USERS_VIEW,
                USERS_MANAGE,
                MODERATION_BANS,
                XP_MANAGE,
                FORUM_MODERATE,
                FORUM_MANAGE,
                CONTENT_MODERATE,
                WALLET_VIEW,
                WALLET_MANAGE,
                ANALYTICS_VIEW,
            ],
        )
        .with_role(
            "moderator",
            [
                DASHBOARD_VIEW,
                USERS_VIEW,
                MODERATION_BANS,
                FORUM_MODERATE,
                CONTENT_MODERATE,
            ],
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RolePermissions;
    use std::collections::HashSet;

    fn walk<'a>(modules: &'a [AdminModule], out: &mut Vec<&'a AdminModule>) {
        for module in modules {
            out.push(module);
            walk(&module.sub_modules, out);
        }
    }

    #[test]
    fn ids_and_routes_are_unique() {
        let modules = default_modules();
        let mut all = Vec::new();
        walk(&modules, &mut all);

        let ids: HashSet<_> = all.iter().map(|m| m.id.as_str()).collect();
        let routes: HashSet<_> = all.iter().map(|m| m.route.as_str()).collect();
        assert_eq!(ids.len(), all.len());
        assert_eq!(routes.len(), all.len());
    }

    #[test]
    fn no_module_is_universally_visible() {
        let modules = default_modules();
        let mut all = Vec::new();
        walk(&modules, &mut all);
        assert!(all.iter().all(|m| !m.permissions.is_empty()));
    }

    #[test]
    fn super_admin_key_is_normalized() {
        let permissions = default_permissions();
        assert_eq!(permissions.permissions_for("super_admin").len(), ALL.len());
        assert!(permissions.permissions_for("user").is_empty());
    }

    #[test]
    fn users_module_has_sub_pages() {
        let modules = default_modules();
        let users = modules.iter().find(|m| m.id == "users").unwrap();
        assert_eq!(users.sub_modules.len(), 3);
    }
}
