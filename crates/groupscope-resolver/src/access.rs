//! Effective permissions of a user across groups and workspaces.
//!
//! Two views coexist and are kept apart on purpose:
//!
//! - [`PermissionResolver::user_group_access`] walks the group hierarchy and
//!   reports the effective permission on every group and workspace, combining
//!   explicit grants with inherited group defaults.
//! - [`PermissionResolver::user_workspaces`] reports only workspaces with an
//!   explicit grant for the user, at that grant.

use std::cmp::Ordering;

use groupscope_core::{Permission, Workspace, WorkspaceGroup};
use serde::Serialize;

use crate::hierarchy::GroupHierarchy;
use crate::tree::GroupItem;

/// A workspace with the effective permission of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceAccess {
    /// Workspace identifier.
    pub workspace_id: String,
    /// Workspace name.
    pub workspace_name: String,
    /// Workspace alias, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Effective permission on the workspace.
    pub permission: Permission,
}

/// A group with the effective permission of one user and the workspaces it
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAccess {
    /// Group identifier.
    pub group_id: String,
    /// Group name.
    pub group_name: String,
    /// Parent group, `None` for roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Full path from the root.
    pub group_path: String,
    /// Effective permission on the group.
    pub permission: Permission,
    /// Workspaces in this group, each at its own effective permission.
    pub workspaces: Vec<WorkspaceAccess>,
}

impl GroupItem for GroupAccess {
    fn group_id(&self) -> &str {
        &self.group_id
    }

    fn parent_group_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    fn group_name(&self) -> &str {
        &self.group_name
    }
}

/// A workspace the user holds an explicit grant on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWorkspace {
    /// Workspace identifier.
    pub workspace_id: String,
    /// Workspace name.
    pub workspace_name: String,
    /// Workspace alias, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// The explicit grant.
    pub permission: Permission,
    /// Owning group, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Owning group name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Path of the owning group; empty when ungrouped.
    pub group_path: String,
}

/// Resolves permissions over one snapshot of groups and workspaces.
#[derive(Debug, Clone)]
pub struct PermissionResolver<'a> {
    hierarchy: GroupHierarchy<'a>,
    workspaces: Vec<Workspace>,
}

impl<'a> PermissionResolver<'a> {
    /// Builds a resolver, annotating `workspaces` with their groups.
    pub fn new(groups: &'a [WorkspaceGroup], workspaces: &[Workspace]) -> Self {
        let hierarchy = GroupHierarchy::new(groups);
        let workspaces = hierarchy.annotate_workspaces(workspaces);
        Self {
            hierarchy,
            workspaces,
        }
    }

    /// The group index.
    pub const fn hierarchy(&self) -> &GroupHierarchy<'a> {
        &self.hierarchy
    }

    /// Workspaces with group annotations applied.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Effective permission of `user_id` on a group: the highest of the
    /// explicit grants and default permissions of the group and all its
    /// ancestors, never below `read`.
    pub fn group_permission(&self, user_id: &str, group_id: &str) -> Permission {
        self.hierarchy
            .ancestors(group_id)
            .fold(Permission::Read, |effective, group| {
                effective
                    .merge_opt(group.explicit_permission(user_id))
                    .merge_opt(group.default_permission)
            })
    }

    /// Effective permission of `user_id` on a workspace: its explicit grant
    /// merged with the effective permission on its group.
    ///
    /// `workspace` should carry its group annotation, as the records from
    /// [`workspaces`](Self::workspaces) do.
    pub fn workspace_permission(&self, user_id: &str, workspace: &Workspace) -> Permission {
        let explicit = Permission::Read.merge_opt(workspace.explicit_permission(user_id));
        match workspace.group_id.as_deref() {
            Some(group_id) => explicit.merge(self.group_permission(user_id, group_id)),
            None => explicit,
        }
    }

    /// Every group with the user's effective permission, each listing its
    /// workspaces at their own effective permission. Groups keep upstream
    /// order.
    pub fn user_group_access(&self, user_id: &str) -> Vec<GroupAccess> {
        self.hierarchy
            .groups()
            .iter()
            .map(|group| GroupAccess {
                group_id: group.id.clone(),
                group_name: group.name.clone(),
                parent_id: group.parent_id.clone(),
                group_path: self.hierarchy.group_path(&group.id).path,
                permission: self.group_permission(user_id, &group.id),
                workspaces: self
                    .workspaces
                    .iter()
                    .filter(|ws| ws.group_id.as_deref() == Some(group.id.as_str()))
                    .map(|ws| WorkspaceAccess {
                        workspace_id: ws.id.clone(),
                        workspace_name: ws.name.clone(),
                        alias: ws.alias.clone(),
                        permission: self.workspace_permission(user_id, ws),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Workspaces where the user holds an explicit grant, at that grant.
    ///
    /// Sorted by group path with ungrouped workspaces last, then by name.
    pub fn user_workspaces(&self, user_id: &str) -> Vec<UserWorkspace> {
        let mut found: Vec<UserWorkspace> = self
            .workspaces
            .iter()
            .filter_map(|ws| {
                let permission = ws.explicit_permission(user_id)?;
                let group_path = ws
                    .group_id
                    .as_deref()
                    .map(|id| self.hierarchy.group_path(id).path)
                    .filter(|path| !path.is_empty())
                    .or_else(|| ws.group_name.clone())
                    .unwrap_or_default();
                Some(UserWorkspace {
                    workspace_id: ws.id.clone(),
                    workspace_name: ws.name.clone(),
                    alias: ws.alias.clone(),
                    permission,
                    group_id: ws.group_id.clone(),
                    group_name: ws.group_name.clone(),
                    group_path,
                })
            })
            .collect();
        found.sort_by(|a, b| {
            by_path_ungrouped_last(&a.group_path, &b.group_path)
                .then_with(|| a.workspace_name.cmp(&b.workspace_name))
        });
        found
    }
}

fn by_path_ungrouped_last(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupscope_core::fixtures::{self, ADA, ALAN, GRACE};

    fn resolver_over<'a>(groups: &'a [WorkspaceGroup], workspaces: &[Workspace]) -> PermissionResolver<'a> {
        PermissionResolver::new(groups, workspaces)
    }

    #[test]
    fn test_group_permission_inherits_from_ancestors() {
        let groups = fixtures::groups();
        let resolver = resolver_over(&groups, &[]);

        // Platform's own default beats Product's.
        assert_eq!(resolver.group_permission(ALAN, "g-platform"), Permission::Write);
        assert_eq!(resolver.group_permission(ALAN, "g-growth"), Permission::Read);
        assert_eq!(resolver.group_permission(GRACE, "g-growth"), Permission::Full);
        assert_eq!(resolver.group_permission(GRACE, "g-product"), Permission::Read);
        assert_eq!(resolver.group_permission(ALAN, "unknown"), Permission::Read);
    }

    #[test]
    fn test_workspace_permission() {
        let groups = fixtures::groups();
        let resolver = resolver_over(&groups, &fixtures::workspaces());
        let ws = |id: &str| {
            resolver
                .workspaces()
                .iter()
                .find(|w| w.id == id)
                .unwrap()
                .clone()
        };

        assert_eq!(resolver.workspace_permission(ADA, &ws("w-roadmap")), Permission::Write);
        assert_eq!(resolver.workspace_permission(ALAN, &ws("w-roadmap")), Permission::Read);
        assert_eq!(resolver.workspace_permission(ALAN, &ws("w-api")), Permission::Write);
        // Explicit comment on Funnel, Growth only yields read.
        assert_eq!(resolver.workspace_permission(ALAN, &ws("w-funnel")), Permission::Comment);
        // Derived group: Growth grants Grace full.
        assert_eq!(resolver.workspace_permission(GRACE, &ws("w-funnel")), Permission::Full);
    }

    #[test]
    fn test_user_group_access() {
        let groups = fixtures::groups();
        let resolver = resolver_over(&groups, &fixtures::workspaces());
        let access = resolver.user_group_access(ALAN);

        assert_eq!(access.len(), groups.len());
        let growth = access.iter().find(|g| g.group_id == "g-growth").unwrap();
        assert_eq!(growth.permission, Permission::Read);
        assert_eq!(growth.group_path, "Product > Growth");
        assert_eq!(growth.workspaces.len(), 1);
        assert_eq!(growth.workspaces[0].workspace_id, "w-funnel");
        assert_eq!(growth.workspaces[0].permission, Permission::Comment);

        let product = access.iter().find(|g| g.group_id == "g-product").unwrap();
        assert!(product.workspaces.is_empty());
    }

    #[test]
    fn test_user_workspaces_are_explicit_only() {
        let groups = fixtures::groups();
        let resolver = resolver_over(&groups, &fixtures::workspaces());

        let grace = resolver.user_workspaces(GRACE);
        assert_eq!(grace.len(), 1, "group grant on Growth is not listed");
        assert_eq!(grace[0].workspace_id, "w-runbook");
        assert_eq!(grace[0].group_path, "Operations");
        assert_eq!(grace[0].permission, Permission::Full);

        assert!(resolver.user_workspaces("nobody").is_empty());
    }

    #[test]
    fn test_user_workspaces_sort() {
        let groups = vec![
            WorkspaceGroup::new("g-b", "Beta"),
            WorkspaceGroup::new("g-a", "Alpha"),
        ];
        let workspaces = vec![
            Workspace::new("w-1", "Zulu").with_grant("u", Permission::Read),
            Workspace::new("w-2", "Yankee")
                .in_group("g-b", "Beta")
                .with_grant("u", Permission::Read),
            Workspace::new("w-3", "Xray")
                .in_group("g-a", "Alpha")
                .with_grant("u", Permission::Read),
            Workspace::new("w-4", "Able").with_grant("u", Permission::Read),
            Workspace::new("w-5", "Whiskey")
                .in_group("g-a", "Alpha")
                .with_grant("u", Permission::Write),
        ];
        let resolver = resolver_over(&groups, &workspaces);
        let names: Vec<_> = resolver
            .user_workspaces("u")
            .into_iter()
            .map(|w| w.workspace_name)
            .collect();
        assert_eq!(names, ["Whiskey", "Xray", "Yankee", "Able", "Zulu"]);
    }

    #[test]
    fn test_access_serializes_camel_case() {
        let groups = fixtures::groups();
        let resolver = resolver_over(&groups, &fixtures::workspaces());
        let json = serde_json::to_value(resolver.user_workspaces(ADA)).unwrap();
        assert_eq!(json[0]["workspaceId"], "w-roadmap");
        assert_eq!(json[0]["permission"], "write");
        assert_eq!(json[0]["groupPath"], "");
        assert!(json[0].get("groupId").is_none());
    }
}
