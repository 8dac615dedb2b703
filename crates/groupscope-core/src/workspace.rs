//! Workspaces and workspace groups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::permission::{self, Permission, PermissionMap};
use crate::serde_util::{non_empty, null_default};

/// Workspace identifier to workspace name.
pub type WorkspaceNames = HashMap<String, String>;

/// Builds the id-to-name lookup used to decorate fields.
#[must_use]
pub fn workspace_names(workspaces: &[Workspace]) -> WorkspaceNames {
    workspaces
        .iter()
        .map(|ws| (ws.id.clone(), ws.name.clone()))
        .collect()
}

/// Embedded block of a workspace record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEmbedded {
    /// Explicit grants on this workspace.
    #[serde(default, deserialize_with = "null_default")]
    pub permissions: PermissionMap,
}

/// A workspace.
///
/// `group_id`/`group_name` may come straight from the upstream record or be
/// filled in from the groups' embedded workspace lists; a workspace with
/// neither is ungrouped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique workspace identifier.
    pub id: String,
    /// Workspace name.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Short alias used in item keys.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Whether the workspace is archived.
    #[serde(default, deserialize_with = "null_default")]
    pub archived: bool,
    /// Display order.
    #[serde(default, deserialize_with = "null_default")]
    pub order: i64,
    /// Kind of items the workspace holds.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
    /// Owning group identifier.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Owning group name.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Embedded permissions.
    #[serde(rename = "_embedded", default, deserialize_with = "null_default")]
    pub embedded: WorkspaceEmbedded,
}

impl Workspace {
    /// Creates a workspace with no group and no explicit grants.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy placed in the given group.
    #[must_use]
    pub fn in_group(mut self, group_id: impl Into<String>, group_name: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self.group_name = Some(group_name.into());
        self
    }

    /// Returns a copy with an explicit grant for `user_id`.
    #[must_use]
    pub fn with_grant(mut self, user_id: impl Into<String>, permission: Permission) -> Self {
        self.embedded.permissions.insert(user_id, permission);
        self
    }

    /// Explicit grants on this workspace.
    #[must_use]
    pub const fn permissions(&self) -> &PermissionMap {
        &self.embedded.permissions
    }

    /// The explicit grant for `user_id`, if any.
    #[must_use]
    pub fn explicit_permission(&self, user_id: &str) -> Option<Permission> {
        self.embedded.permissions.get(user_id)
    }

    /// True when the workspace carries a group annotation.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }
}

/// Embedded block of a workspace group record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEmbedded {
    /// Workspaces placed directly in this group.
    #[serde(default, deserialize_with = "null_default")]
    pub workspaces: Vec<Workspace>,
    /// Explicit grants on the group itself.
    #[serde(default, deserialize_with = "null_default")]
    pub permissions: PermissionMap,
}

/// A workspace group. Groups form a forest through `parent_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceGroup {
    /// Unique group identifier.
    pub id: String,
    /// Group name.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// Parent group; `None` for a root.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Display order among siblings.
    #[serde(default, deserialize_with = "null_default")]
    pub order: i64,
    /// Permission every team member gets absent an explicit grant.
    #[serde(
        default,
        deserialize_with = "permission::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_permission: Option<Permission>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
    /// Embedded workspaces and permissions.
    #[serde(rename = "_embedded", default, deserialize_with = "null_default")]
    pub embedded: GroupEmbedded,
}

impl WorkspaceGroup {
    /// Creates a root group with no default permission.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy nested under `parent_id`.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Returns a copy with the given display order.
    #[must_use]
    pub const fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Returns a copy with the given default permission.
    #[must_use]
    pub const fn with_default(mut self, permission: Permission) -> Self {
        self.default_permission = Some(permission);
        self
    }

    /// Returns a copy with an explicit grant for `user_id`.
    #[must_use]
    pub fn with_grant(mut self, user_id: impl Into<String>, permission: Permission) -> Self {
        self.embedded.permissions.insert(user_id, permission);
        self
    }

    /// Returns a copy listing `workspace` among its embedded workspaces.
    #[must_use]
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.embedded.workspaces.push(workspace);
        self
    }

    /// The explicit grant for `user_id` on this group, if any.
    #[must_use]
    pub fn explicit_permission(&self, user_id: &str) -> Option<Permission> {
        self.embedded.permissions.get(user_id)
    }

    /// True for groups without a parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_workspace() {
        let json = r#"{
            "id": "w-1",
            "name": "Roadmap",
            "alias": "RM",
            "archived": false,
            "groupId": "",
            "_embedded": {"permissions": {"u-1": "write", "u-2": "full"}}
        }"#;
        let ws: Workspace = serde_json::from_str(json).unwrap();
        assert_eq!(ws.alias.as_deref(), Some("RM"));
        assert!(ws.group_id.is_none(), "blank groupId means ungrouped");
        assert_eq!(ws.explicit_permission("u-1"), Some(Permission::Write));
        assert_eq!(ws.explicit_permission("u-3"), None);
        assert_eq!(ws.permissions().len(), 2);
    }

    #[test]
    fn test_decode_workspace_without_embedded() {
        let ws: Workspace = serde_json::from_str(r#"{"id":"w","_embedded":null}"#).unwrap();
        assert!(ws.permissions().is_empty());
        assert!(!ws.is_grouped());
    }

    #[test]
    fn test_decode_group() {
        let json = r#"{
            "id": "g-2",
            "name": "Platform",
            "parentId": "g-1",
            "order": 3,
            "defaultPermission": "comment",
            "_embedded": {
                "workspaces": [{"id": "w-1", "name": "Roadmap"}],
                "permissions": {"u-1": "full"}
            }
        }"#;
        let group: WorkspaceGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.parent_id.as_deref(), Some("g-1"));
        assert_eq!(group.order, 3);
        assert_eq!(group.default_permission, Some(Permission::Comment));
        assert_eq!(group.embedded.workspaces.len(), 1);
        assert_eq!(group.explicit_permission("u-1"), Some(Permission::Full));
        assert!(!group.is_root());
    }

    #[test]
    fn test_blank_default_permission() {
        let group: WorkspaceGroup =
            serde_json::from_str(r#"{"id":"g","name":"G","defaultPermission":"","parentId":null}"#)
                .unwrap();
        assert_eq!(group.default_permission, None);
        assert!(group.is_root());
    }

    #[test]
    fn test_workspace_names() {
        let names = workspace_names(&[Workspace::new("w-1", "One"), Workspace::new("w-2", "Two")]);
        assert_eq!(names.get("w-2").map(String::as_str), Some("Two"));
    }

    #[test]
    fn test_builders() {
        let ws = Workspace::new("w", "W")
            .in_group("g", "G")
            .with_grant("u", Permission::Write);
        assert_eq!(ws.group_name.as_deref(), Some("G"));
        assert_eq!(ws.explicit_permission("u"), Some(Permission::Write));

        let group = WorkspaceGroup::new("g", "G")
            .with_parent("p")
            .with_order(2)
            .with_default(Permission::Read);
        assert_eq!(group.parent_id.as_deref(), Some("p"));
        assert_eq!(group.default_permission, Some(Permission::Read));
    }
}
