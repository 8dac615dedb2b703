//! Nested group tree for hierarchical display.

use std::collections::{HashMap, HashSet};

use groupscope_core::WorkspaceGroup;
use serde::Serialize;

/// Something that sits in the group forest.
pub trait GroupItem {
    /// Group identifier.
    fn group_id(&self) -> &str;
    /// Parent group identifier, `None` for roots.
    fn parent_group_id(&self) -> Option<&str>;
    /// Name used to order siblings.
    fn group_name(&self) -> &str;
}

impl GroupItem for WorkspaceGroup {
    fn group_id(&self) -> &str {
        &self.id
    }

    fn parent_group_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    fn group_name(&self) -> &str {
        &self.name
    }
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupNode<T> {
    /// The group at this node.
    #[serde(flatten)]
    pub item: T,
    /// Depth below the roots; roots are level 0.
    pub level: usize,
    /// Child nodes, sorted by name.
    pub children: Vec<GroupNode<T>>,
}

impl<T> GroupNode<T> {
    /// Visits this node and its descendants depth-first, parents first.
    pub fn walk(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Nests a flat list of groups, sorting roots and siblings by name.
///
/// Orphans, items whose parent is not in the list, are kept and promoted to
/// roots rather than dropped. Items caught in a parent cycle are unreachable
/// from any root and are left out. When several items share an id only the
/// first is kept, matching [`GroupHierarchy`](crate::GroupHierarchy).
pub fn build_tree<T: GroupItem>(items: Vec<T>) -> Vec<GroupNode<T>> {
    let mut ids: HashSet<String> = HashSet::with_capacity(items.len());
    let items: Vec<T> = items
        .into_iter()
        .filter(|item| {
            let fresh = ids.insert(item.group_id().to_string());
            if !fresh {
                tracing::warn!(
                    group_id = item.group_id(),
                    "duplicate group id left out of tree"
                );
            }
            fresh
        })
        .collect();
    let total = items.len();

    let mut roots = Vec::new();
    let mut by_parent: HashMap<String, Vec<T>> = HashMap::new();
    for item in items {
        match item.parent_group_id() {
            Some(parent) if ids.contains(parent) => {
                by_parent.entry(parent.to_string()).or_default().push(item);
            }
            _ => roots.push(item),
        }
    }

    let tree = attach(roots, 0, &mut by_parent);
    let placed: usize = tree.iter().map(|node| node.walk().len()).sum();
    if placed < total {
        tracing::warn!(
            placed,
            total,
            "groups unreachable from any root left out of tree"
        );
    }
    tree
}

fn attach<T: GroupItem>(
    items: Vec<T>,
    level: usize,
    by_parent: &mut HashMap<String, Vec<T>>,
) -> Vec<GroupNode<T>> {
    let mut nodes: Vec<GroupNode<T>> = items
        .into_iter()
        .map(|item| {
            let children = by_parent.remove(item.group_id()).unwrap_or_default();
            GroupNode {
                children: attach(children, level + 1, by_parent),
                level,
                item,
            }
        })
        .collect();
    nodes.sort_by(|a, b| a.item.group_name().cmp(b.item.group_name()));
    nodes
}
