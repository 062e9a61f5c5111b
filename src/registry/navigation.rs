//! Navigation tree built from the store for one viewer.

use super::module::ModuleEntry;
use super::store::ModuleStore;
use serde::Serialize;

/// One menu entry. Children are filtered and sorted the same way as roots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavNode {
    pub id: String,
    pub name: String,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_modules: Vec<NavNode>,
}

impl NavNode {
    fn from_entry(entry: &ModuleEntry, sub_modules: Vec<NavNode>) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            route: entry.route.clone(),
            icon: entry.icon.clone(),
            order: entry.order,
            sub_modules,
        }
    }

    /// Find a node by id anywhere below (and including) this one.
    pub fn find(&self, id: &str) -> Option<&NavNode> {
        if self.id == id {
            return Some(self);
        }
        self.sub_modules.iter().find_map(|child| child.find(id))
    }
}

/// Enabled entries among `ids`, stable-sorted by `order`.
pub(crate) fn enabled_sorted<'a>(store: &'a ModuleStore, ids: &[String]) -> Vec<&'a ModuleEntry> {
    let mut level: Vec<&ModuleEntry> = ids
        .iter()
        .filter_map(|id| store.get(id))
        .filter(|entry| entry.enabled)
        .collect();
    level.sort_by_key(|entry| entry.order);
    level
}

/// Build one level of navigation, recursing into each visible node.
///
/// Visibility is decided per node; a child is never shown just because its
/// parent is, and a parent with no visible children is still shown.
pub(crate) fn build_level<F>(store: &ModuleStore, ids: &[String], visible: &F) -> Vec<NavNode>
where
    F: Fn(&ModuleEntry) -> bool,
{
    enabled_sorted(store, ids)
        .into_iter()
        .filter(|entry| visible(entry))
        .map(|entry| NavNode::from_entry(entry, build_level(store, &entry.children, visible)))
        .collect()
}
