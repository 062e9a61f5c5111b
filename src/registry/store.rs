//! Canonical module store.
//!
//! One map from id to [`ModuleEntry`] plus the ordered list of root ids.
//! Parent/child links are ids into the same map, so there is a single source
//! of truth for both lookups and tree walks.

use super::module::{AdminModule, ModuleEntry};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ModuleStore {
    nodes: HashMap<String, ModuleEntry>,
    roots: Vec<String>,
}

impl ModuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `module` (and, recursively, its sub-modules).
    ///
    /// With `parent == None` the module is a root: an existing root keeps its
    /// position, anything else is appended. A module that already lives at a
    /// different position is moved. Children the previous version had but the
    /// new one does not are dropped together with their descendants.
    pub fn upsert(&mut self, module: AdminModule, parent: Option<&str>) {
        let (entry, sub_modules) = ModuleEntry::split(module, parent.map(str::to_owned));
        let id = entry.id.clone();

        let stale: Vec<String> = match self.nodes.remove(&id) {
            Some(previous) => {
                if previous.parent.as_deref() != parent {
                    self.detach(&id, previous.parent.as_deref());
                }
                previous
                    .children
                    .into_iter()
                    .filter(|child| !entry.children.contains(child))
                    .collect()
            }
            None => Vec::new(),
        };

        match parent {
            None => {
                if !self.roots.contains(&id) {
                    self.roots.push(id.clone());
                }
            }
            Some(parent_id) => {
                if let Some(parent_entry) = self.nodes.get_mut(parent_id)
                    && !parent_entry.children.contains(&id)
                {
                    parent_entry.children.push(id.clone());
                }
            }
        }

        self.nodes.insert(id.clone(), entry);

        for child in sub_modules {
            self.upsert(child, Some(&id));
        }

        // Old children may have been re-registered deeper in the new subtree,
        // in which case their parent has changed and they must survive.
        for orphan in stale {
            let still_ours = self
                .nodes
                .get(&orphan)
                .is_some_and(|node| node.parent.as_deref() == Some(id.as_str()));
            if still_ours {
                self.remove_subtree(&orphan);
            }
        }
    }

    /// Remove `id` and every descendant. Returns `false` if `id` was unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(parent) = self.nodes.get(id).map(|node| node.parent.clone()) else {
            return false;
        };
        self.detach(id, parent.as_deref());
        self.remove_subtree(id);
        true
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&ModuleEntry> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut ModuleEntry> {
        self.nodes.get_mut(id)
    }

    #[inline]
    pub fn has(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Root ids in registration order.
    pub fn root_ids(&self) -> &[String] {
        &self.roots
    }

    /// Root entries in registration order (unsorted).
    pub fn all_roots(&self) -> Vec<&ModuleEntry> {
        self.roots.iter().filter_map(|id| self.nodes.get(id)).collect()
    }

    /// Every entry, depth-first from the roots in stored order.
    pub fn all_flat(&self) -> Vec<&ModuleEntry> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<&str> = self.roots.iter().rev().map(String::as_str).collect();
        while let Some(id) = stack.pop() {
            if let Some(entry) = self.nodes.get(id) {
                out.push(entry);
                stack.extend(entry.children.iter().rev().map(String::as_str));
            }
        }
        out
    }

    /// Child entries of `id` in stored order.
    pub fn children(&self, id: &str) -> Vec<&ModuleEntry> {
        self.nodes
            .get(id)
            .map(|entry| {
                entry
                    .children
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Owned nested copy of the subtree rooted at `id`.
    pub fn materialize(&self, id: &str) -> Option<AdminModule> {
        let entry = self.nodes.get(id)?;
        let mut module = entry.to_module();
        module.sub_modules = entry
            .children
            .iter()
            .filter_map(|child| self.materialize(child))
            .collect();
        Some(module)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    fn detach(&mut self, id: &str, parent: Option<&str>) {
        match parent {
            None => self.roots.retain(|root| root != id),
            Some(parent_id) => {
                if let Some(parent_entry) = self.nodes.get_mut(parent_id) {
                    parent_entry.children.retain(|child| child != id);
                }
            }
        }
    }

    fn remove_subtree(&mut self, id: &str) {
        if let Some(entry) = self.nodes.remove(id) {
            for child in &entry.children {
                self.remove_subtree(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str) -> AdminModule {
        AdminModule::new(id, id, format!("/admin/{id}")).with_component(id)
    }

    fn ids(entries: Vec<&ModuleEntry>) -> Vec<&str> {
        entries.into_iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn upsert_registers_nested_children() {
        let mut store = ModuleStore::new();
        store.upsert(
            module("users").with_sub_module(module("users-list").with_sub_module(module("deep"))),
            None,
        );

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("deep").and_then(|e| e.parent.as_deref()), Some("users-list"));
        assert_eq!(ids(store.all_flat()), vec!["users", "users-list", "deep"]);
    }

    #[test]
    fn upsert_existing_root_keeps_position() {
        let mut store = ModuleStore::new();
        store.upsert(module("a"), None);
        store.upsert(module("b"), None);
        store.upsert(module("c"), None);

        store.upsert(module("a").with_order(9), None);

        assert_eq!(store.root_ids(), &["a", "b", "c"]);
        assert_eq!(store.get("a").map(|e| e.order), Some(9));
    }

    #[test]
    fn upsert_drops_children_missing_from_new_version() {
        let mut store = ModuleStore::new();
        store.upsert(
            module("users").with_sub_module(module("old").with_sub_module(module("old-deep"))),
            None,
        );
        store.upsert(module("users").with_sub_module(module("new")), None);

        assert!(!store.has("old"));
        assert!(!store.has("old-deep"));
        assert!(store.has("new"));
        assert_eq!(store.get("users").map(|e| e.children.clone()), Some(vec!["new".to_string()]));
    }

    #[test]
    fn upsert_moves_root_under_new_parent() {
        let mut store = ModuleStore::new();
        store.upsert(module("reports"), None);
        store.upsert(module("forum").with_sub_module(module("reports")), None);

        assert_eq!(store.root_ids(), &["forum"]);
        assert_eq!(store.get("reports").and_then(|e| e.parent.as_deref()), Some("forum"));
    }

    #[test]
    fn upsert_moves_child_to_root() {
        let mut store = ModuleStore::new();
        store.upsert(module("forum").with_sub_module(module("reports")), None);
        store.upsert(module("reports"), None);

        assert_eq!(store.root_ids(), &["forum", "reports"]);
        assert!(store.children("forum").is_empty());
        assert!(store.get("reports").is_some_and(ModuleEntry::is_root));
    }

    #[test]
    fn old_child_reregistered_deeper_survives() {
        let mut store = ModuleStore::new();
        store.upsert(module("p").with_sub_module(module("x")), None);
        store.upsert(module("p").with_sub_module(module("y").with_sub_module(module("x"))), None);

        assert!(store.has("x"));
        assert_eq!(store.get("x").and_then(|e| e.parent.as_deref()), Some("y"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_detaches_and_forgets_descendants() {
        let mut store = ModuleStore::new();
        store.upsert(
            module("users").with_sub_module(module("list").with_sub_module(module("deep"))),
            None,
        );
        store.upsert(module("forum"), None);

        assert!(store.remove("list"));
        assert!(!store.has("list"));
        assert!(!store.has("deep"));
        assert!(store.children("users").is_empty());

        assert!(store.remove("users"));
        assert_eq!(store.root_ids(), &["forum"]);
        assert!(!store.remove("users"));
    }

    #[test]
    fn materialize_rebuilds_nested_module() {
        let mut store = ModuleStore::new();
        store.upsert(module("users").with_sub_module(module("list")), None);

        let tree = store.materialize("users").unwrap();
        assert_eq!(tree.sub_modules.len(), 1);
        assert_eq!(tree.sub_modules[0].id, "list");
        assert!(store.materialize("missing").is_none());
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = ModuleStore::new();
        store.upsert(module("users").with_sub_module(module("list")), None);
        store.clear();
        assert!(store.is_empty());
        assert!(store.all_roots().is_empty());
    }
}
