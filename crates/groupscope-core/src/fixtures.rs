//! Test fixtures for Groupscope development and testing.
//!
//! A small, fixed team shared by the tests of every crate in the workspace:
//!
//! ```text
//! Product (default read)
//! ├── Growth (order 0, grace: full)   → Funnel (listed by the group only)
//! └── Platform (order 1, default write) → API
//! Operations                           → Runbook
//! (ungrouped)                          → Roadmap
//! ```
//!
//! # Example
//!
//! ```
//! use groupscope_core::fixtures;
//!
//! assert_eq!(fixtures::users().len(), 3);
//! assert!(fixtures::groups().iter().any(|g| g.name == "Platform"));
//! ```

use crate::field::{Field, FieldScope, FieldWorkspace};
use crate::license::{SeatCount, Seats, TeamLicense};
use crate::permission::Permission;
use crate::user::{User, UserRole};
use crate::workspace::{Workspace, WorkspaceGroup};

/// Team administrator with a direct `write` grant on Roadmap.
pub const ADA: &str = "u-ada";
/// Editor with a `full` grant on the Growth group and on Runbook.
pub const GRACE: &str = "u-grace";
/// Contributor with a `comment` grant on Funnel.
pub const ALAN: &str = "u-alan";

fn user(id: &str, name: &str, email: &str, role: UserRole) -> User {
    User {
        user_id: id.to_string(),
        team_id: "t-1".to_string(),
        full_name: name.to_string(),
        email: email.to_string(),
        role,
        ..User::default()
    }
}

/// Team members, deliberately not in name order.
#[must_use]
pub fn users() -> Vec<User> {
    vec![
        user(GRACE, "Grace Hopper", "grace@example.com", UserRole::Editor),
        user(ALAN, "alan Turing", "alan@example.com", UserRole::Contributor),
        user(ADA, "Ada Lovelace", "ada@example.com", UserRole::Admin),
    ]
}

/// Workspace groups. Growth embeds Funnel; no workspace record points back.
#[must_use]
pub fn groups() -> Vec<WorkspaceGroup> {
    vec![
        WorkspaceGroup::new("g-ops", "Operations"),
        WorkspaceGroup::new("g-platform", "Platform")
            .with_parent("g-product")
            .with_order(1)
            .with_default(Permission::Write)
            .with_workspace(Workspace::new("w-api", "API")),
        WorkspaceGroup::new("g-product", "Product").with_default(Permission::Read),
        WorkspaceGroup::new("g-growth", "Growth")
            .with_parent("g-product")
            .with_grant(GRACE, Permission::Full)
            .with_workspace(Workspace::new("w-funnel", "Funnel")),
    ]
}

/// Workspaces with their explicit grants.
#[must_use]
pub fn workspaces() -> Vec<Workspace> {
    vec![
        Workspace::new("w-roadmap", "Roadmap").with_grant(ADA, Permission::Write),
        Workspace::new("w-api", "API").in_group("g-platform", "Platform"),
        Workspace::new("w-funnel", "Funnel").with_grant(ALAN, Permission::Comment),
        Workspace::new("w-runbook", "Runbook")
            .in_group("g-ops", "Operations")
            .with_grant(GRACE, Permission::Full),
    ]
}

/// One team field and one workspace field.
#[must_use]
pub fn fields() -> Vec<Field> {
    vec![
        Field::new("f-priority", "Priority").with_scope(FieldScope::Team {
            all_workspace_ids: vec!["w-roadmap".into(), "w-api".into(), "w-gone".into()],
        }),
        Field::new("f-effort", "Effort").with_scope(FieldScope::Workspace {
            workspaces: vec![FieldWorkspace {
                workspace_id: "w-funnel".into(),
                order: 0,
            }],
        }),
    ]
}

const fn seats(total: usize, used: usize) -> SeatCount {
    SeatCount {
        total,
        used,
        free: total - used,
    }
}

/// The team license. Seat usage deliberately differs from [`users`].
#[must_use]
pub fn team_license() -> TeamLicense {
    let mut license = TeamLicense {
        team_id: "t-1".to_string(),
        slug: "acme".to_string(),
        name: "Acme".to_string(),
        ..TeamLicense::default()
    };
    license.state.seats = Seats {
        admin: seats(2, 2),
        editor: seats(5, 4),
        contributor: seats(10, 7),
        any: seats(17, 13),
    };
    license
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ids_are_unique() {
        let mut ids: Vec<_> = workspaces().into_iter().map(|w| w.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), workspaces().len());
    }

    #[test]
    fn test_fixture_fields() {
        assert_eq!(fields()[0].workspace_count(), 3);
        assert!(fields()[0].is_team_field());
    }
}
