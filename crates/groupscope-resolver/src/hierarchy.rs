//! Parent/child relationships between workspace groups.

use std::collections::{BTreeMap, HashMap, HashSet};

use groupscope_core::{Workspace, WorkspaceGroup};
use serde::Serialize;

/// Key of the top-level groups in [`GroupHierarchy::children_by_parent`].
pub const ROOT_KEY: &str = "root";

/// Separator between group names in a path.
pub const PATH_SEPARATOR: &str = " > ";

/// Full path of a group from its root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupPath {
    /// Group names from the root down, joined with `" > "`.
    pub path: String,
    /// The ancestor walk hit a parent cycle and stopped early.
    pub truncated: bool,
}

impl std::fmt::Display for GroupPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Index over a borrowed list of workspace groups.
///
/// Nothing is cached between calls; the index is cheap to rebuild from a
/// snapshot whenever a query needs it.
#[derive(Debug, Clone)]
pub struct GroupHierarchy<'a> {
    groups: &'a [WorkspaceGroup],
    by_id: HashMap<&'a str, &'a WorkspaceGroup>,
}

impl<'a> GroupHierarchy<'a> {
    /// Indexes `groups` by id. With duplicate ids the first record wins.
    pub fn new(groups: &'a [WorkspaceGroup]) -> Self {
        let mut by_id = HashMap::with_capacity(groups.len());
        for group in groups {
            by_id.entry(group.id.as_str()).or_insert(group);
        }
        Self { groups, by_id }
    }

    /// All groups in upstream order.
    pub const fn groups(&self) -> &'a [WorkspaceGroup] {
        self.groups
    }

    /// Looks up a group by id.
    pub fn get(&self, group_id: &str) -> Option<&'a WorkspaceGroup> {
        self.by_id.get(group_id).copied()
    }

    /// Walks from `group_id` up to its root, yielding the group itself first.
    ///
    /// The walk ends at a group without a parent, at a parent id that is not
    /// known, or at the first group seen twice.
    pub fn ancestors(&self, group_id: &str) -> Ancestors<'_, 'a> {
        Ancestors {
            hierarchy: self,
            next: self.get(group_id),
            visited: HashSet::new(),
            truncated: false,
        }
    }

    /// Immediate children of every parent, keyed by parent id with
    /// [`ROOT_KEY`] for top-level groups.
    ///
    /// Siblings are ordered by their `order` field; equal orders keep
    /// upstream order.
    pub fn children_by_parent(&self) -> BTreeMap<String, Vec<WorkspaceGroup>> {
        let mut children: BTreeMap<String, Vec<WorkspaceGroup>> = BTreeMap::new();
        for group in self.groups {
            let key = group.parent_id.as_deref().unwrap_or(ROOT_KEY);
            children
                .entry(key.to_string())
                .or_default()
                .push(group.clone());
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|group| group.order);
        }
        children
    }

    /// Names from the root down to `group_id`, joined with `" > "`.
    ///
    /// Unknown groups have an empty path. A missing parent ends the path
    /// quietly; a parent cycle ends it with `truncated` set.
    pub fn group_path(&self, group_id: &str) -> GroupPath {
        let mut walk = self.ancestors(group_id);
        let mut names: Vec<&str> = walk.by_ref().map(|group| group.name.as_str()).collect();
        names.reverse();
        GroupPath {
            path: names.join(PATH_SEPARATOR),
            truncated: walk.truncated(),
        }
    }

    /// Owning group of each workspace listed in a group's embedded
    /// workspaces.
    pub fn derived_workspace_groups(&self) -> HashMap<&'a str, &'a WorkspaceGroup> {
        let mut owners: HashMap<&'a str, &'a WorkspaceGroup> = HashMap::new();
        for group in self.groups {
            for workspace in &group.embedded.workspaces {
                match owners.get(workspace.id.as_str()) {
                    Some(owner) if owner.id != group.id => {
                        tracing::warn!(
                            workspace_id = %workspace.id,
                            kept = %owner.id,
                            ignored = %group.id,
                            "workspace listed by two groups"
                        );
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(workspace.id.as_str(), group);
                    }
                }
            }
        }
        owners
    }

    /// Copies `workspaces` with group id and name filled in.
    ///
    /// A group id on the workspace record itself wins over one derived from
    /// the groups' embedded lists; a missing name is taken from the group.
    pub fn annotate_workspaces(&self, workspaces: &[Workspace]) -> Vec<Workspace> {
        let derived = self.derived_workspace_groups();
        workspaces
            .iter()
            .map(|workspace| {
                let mut workspace = workspace.clone();
                let owner = derived.get(workspace.id.as_str()).copied();
                let direct = workspace.group_id.clone();
                match (direct.as_deref(), owner) {
                    (Some(direct), Some(owner)) if direct != owner.id => {
                        tracing::warn!(
                            workspace_id = %workspace.id,
                            direct,
                            derived = %owner.id,
                            "workspace group annotation disagrees with group listing"
                        );
                    }
                    (None, Some(owner)) => {
                        workspace.group_id = Some(owner.id.clone());
                        workspace.group_name = Some(owner.name.clone());
                    }
                    _ => {}
                }
                if workspace.group_name.is_none() {
                    workspace.group_name = workspace
                        .group_id
                        .as_deref()
                        .and_then(|id| self.get(id))
                        .map(|group| group.name.clone());
                }
                workspace
            })
            .collect()
    }
}

/// Iterator returned by [`GroupHierarchy::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'h, 'a> {
    hierarchy: &'h GroupHierarchy<'a>,
    next: Option<&'a WorkspaceGroup>,
    visited: HashSet<&'a str>,
    truncated: bool,
}

impl<'a> Ancestors<'_, 'a> {
    /// True once the walk has stopped on a parent cycle.
    pub const fn truncated(&self) -> bool {
        self.truncated
    }
}

impl<'a> Iterator for Ancestors<'_, 'a> {
    type Item = &'a WorkspaceGroup;

    fn next(&mut self) -> Option<Self::Item> {
        let group = self.next.take()?;
        if !self.visited.insert(group.id.as_str()) {
            self.truncated = true;
            tracing::warn!(group_id = %group.id, "cycle in workspace group parents");
            return None;
        }
        self.next = group
            .parent_id
            .as_deref()
            .and_then(|parent| self.hierarchy.get(parent));
        Some(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupscope_core::fixtures;

    fn chain() -> Vec<WorkspaceGroup> {
        vec![
            WorkspaceGroup::new("c", "C").with_parent("b"),
            WorkspaceGroup::new("a", "A"),
            WorkspaceGroup::new("b", "B").with_parent("a"),
        ]
    }

    #[test]
    fn test_group_path() {
        let groups = chain();
        let hierarchy = GroupHierarchy::new(&groups);
        let path = hierarchy.group_path("c");
        assert_eq!(path.path, "A > B > C");
        assert!(!path.truncated);
        assert_eq!(hierarchy.group_path("a").to_string(), "A");
        assert_eq!(hierarchy.group_path("nope"), GroupPath::default());
    }

    #[test]
    fn test_missing_parent_ends_path() {
        let groups = vec![WorkspaceGroup::new("x", "X").with_parent("gone")];
        let path = GroupHierarchy::new(&groups).group_path("x");
        assert_eq!(path.path, "X");
        assert!(!path.truncated);
    }

    #[test]
    fn test_cycle_is_truncated() {
        let groups = vec![
            WorkspaceGroup::new("a", "A").with_parent("c"),
            WorkspaceGroup::new("b", "B").with_parent("a"),
            WorkspaceGroup::new("c", "C").with_parent("b"),
        ];
        let path = GroupHierarchy::new(&groups).group_path("c");
        assert_eq!(path.path, "A > B > C");
        assert!(path.truncated);

        let own_parent = vec![WorkspaceGroup::new("s", "Self").with_parent("s")];
        let path = GroupHierarchy::new(&own_parent).group_path("s");
        assert_eq!(path.path, "Self");
        assert!(path.truncated);
    }

    #[test]
    fn test_children_by_parent() {
        let groups = fixtures::groups();
        let children = GroupHierarchy::new(&groups).children_by_parent();

        let roots: Vec<_> = children[ROOT_KEY].iter().map(|g| g.id.as_str()).collect();
        assert_eq!(roots, ["g-ops", "g-product"]);
        let product: Vec<_> = children["g-product"].iter().map(|g| g.id.as_str()).collect();
        assert_eq!(product, ["g-growth", "g-platform"], "ordered by order field");
    }

    #[test]
    fn test_equal_order_is_stable() {
        let groups = vec![
            WorkspaceGroup::new("z", "Z").with_parent("p"),
            WorkspaceGroup::new("y", "Y").with_parent("p").with_order(-1),
            WorkspaceGroup::new("x", "X").with_parent("p"),
        ];
        let children = GroupHierarchy::new(&groups).children_by_parent();
        let ids: Vec<_> = children["p"].iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["y", "z", "x"]);
        assert!(!children.contains_key(ROOT_KEY));
    }

    #[test]
    fn test_annotate_workspaces() {
        let groups = fixtures::groups();
        let workspaces = fixtures::workspaces();
        let annotated = GroupHierarchy::new(&groups).annotate_workspaces(&workspaces);

        let by_id: HashMap<_, _> = annotated.iter().map(|w| (w.id.as_str(), w)).collect();
        assert!(!by_id["w-roadmap"].is_grouped());
        assert_eq!(by_id["w-api"].group_id.as_deref(), Some("g-platform"));
        assert_eq!(by_id["w-funnel"].group_id.as_deref(), Some("g-growth"));
        assert_eq!(by_id["w-funnel"].group_name.as_deref(), Some("Growth"));
        assert_eq!(by_id["w-runbook"].group_name.as_deref(), Some("Operations"));
        // Source records are untouched.
        assert!(workspaces[2].group_id.is_none());
    }

    #[test]
    fn test_direct_annotation_wins() {
        let groups = vec![
            WorkspaceGroup::new("g-1", "One").with_workspace(Workspace::new("w", "W")),
            WorkspaceGroup::new("g-2", "Two"),
        ];
        let mut direct = Workspace::new("w", "W");
        direct.group_id = Some("g-2".to_string());

        let annotated = GroupHierarchy::new(&groups).annotate_workspaces(&[direct]);
        assert_eq!(annotated[0].group_id.as_deref(), Some("g-2"));
        assert_eq!(annotated[0].group_name.as_deref(), Some("Two"));
    }

    #[test]
    fn test_first_listing_group_owns_workspace() {
        let groups = vec![
            WorkspaceGroup::new("g-1", "One").with_workspace(Workspace::new("w", "W")),
            WorkspaceGroup::new("g-2", "Two").with_workspace(Workspace::new("w", "W")),
        ];
        let hierarchy = GroupHierarchy::new(&groups);
        let owners = hierarchy.derived_workspace_groups();
        assert_eq!(owners["w"].id, "g-1");
    }
}
