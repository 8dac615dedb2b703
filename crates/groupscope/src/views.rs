//! Result shapes of the directory queries.

use groupscope_core::{Field, Permission, Seats, User, UserRole};
use serde::{Deserialize, Serialize};

/// Display name given to grant holders missing from the user list.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Creation date prefix of the placeholder fields the UI hides.
pub const PLACEHOLDER_CREATED_PREFIX: &str = "2025-03-20";

/// A user with an explicit grant on one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUser {
    /// User identifier.
    pub user_id: String,
    /// Display name, or [`UNKNOWN_USER`].
    pub full_name: String,
    /// Email address; empty for unknown users.
    pub email: String,
    /// The grant.
    pub permission: Permission,
}

impl WorkspaceUser {
    /// Pairs a grant with its holder, or with a placeholder when the holder
    /// is not a known team member.
    pub fn resolve(user_id: &str, permission: Permission, user: Option<&User>) -> Self {
        match user {
            Some(user) => Self {
                user_id: user_id.to_string(),
                full_name: user.full_name.clone(),
                email: user.email.clone(),
                permission,
            },
            None => Self {
                user_id: user_id.to_string(),
                full_name: UNKNOWN_USER.to_string(),
                email: String::new(),
                permission,
            },
        }
    }
}

/// Grant counts on one workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUserStats {
    /// Users with any grant.
    pub total_users: usize,
    /// Users with `write` or `full`.
    #[serde(rename = "totalEditors")]
    pub editors: usize,
    /// Users with `full`.
    #[serde(rename = "totalAdmins")]
    pub admins: usize,
}

impl WorkspaceUserStats {
    /// Counts the grants in `users`.
    pub fn from_users(users: &[WorkspaceUser]) -> Self {
        Self {
            total_users: users.len(),
            editors: users.iter().filter(|u| u.permission.is_editor()).count(),
            admins: users.iter().filter(|u| u.permission.is_admin()).count(),
        }
    }
}

/// Team members by role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRoleStats {
    /// All team members.
    pub total_users: usize,
    /// Team administrators.
    pub admins: usize,
    /// Editor seats.
    pub editors: usize,
    /// Contributor seats.
    pub contributors: usize,
}

impl TeamRoleStats {
    /// Counts the roles in `users`. Unknown roles only count towards the
    /// total.
    pub fn from_users(users: &[User]) -> Self {
        users.iter().fold(
            Self {
                total_users: users.len(),
                ..Self::default()
            },
            |mut stats, user| {
                match &user.role {
                    UserRole::Admin => stats.admins += 1,
                    UserRole::Editor => stats.editors += 1,
                    UserRole::Contributor => stats.contributors += 1,
                    UserRole::Other(_) => {}
                }
                stats
            },
        )
    }

    /// Role counts taken from the license's used seats.
    pub const fn from_seats(seats: &Seats) -> Self {
        Self {
            total_users: seats.admin.used + seats.editor.used + seats.contributor.used,
            admins: seats.admin.used,
            editors: seats.editor.used,
            contributors: seats.contributor.used,
        }
    }
}

/// Identifier and alias of a workspace found by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRef {
    /// Workspace identifier.
    pub id: String,
    /// Workspace alias, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Narrows [`Directory::list_fields`](crate::Directory::list_fields).
///
/// The default filter keeps every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    /// Keep only team fields (`true`) or only workspace fields (`false`).
    pub team_field: Option<bool>,
    /// Keep only fields associated with this workspace.
    pub workspace_id: Option<String>,
    /// Drop placeholder fields created on a date with this prefix.
    pub hide_placeholders: Option<String>,
}

impl FieldFilter {
    /// A filter that hides the UI's placeholder fields.
    pub fn without_placeholders() -> Self {
        Self {
            hide_placeholders: Some(PLACEHOLDER_CREATED_PREFIX.to_string()),
            ..Self::default()
        }
    }

    /// Returns true if `field` passes the filter.
    pub fn matches(&self, field: &Field) -> bool {
        if self
            .team_field
            .is_some_and(|team| team != field.is_team_field())
        {
            return false;
        }
        if let Some(workspace_id) = &self.workspace_id {
            if !field.scope.workspace_ids().any(|id| id == workspace_id.as_str()) {
                return false;
            }
        }
        if let Some(prefix) = &self.hide_placeholders {
            if field.is_placeholder(prefix) {
                return false;
            }
        }
        true
    }
}
