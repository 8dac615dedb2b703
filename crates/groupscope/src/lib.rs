//! # Groupscope
//!
//! Cached workspace, field, user and permission queries over the Airfocus
//! project-management API.
//!
//! A [`Directory`] owns a snapshot cache for one API token and answers the
//! queries a browser UI needs: workspaces with their groups, fields with
//! workspace names, team members, who holds which grant on a workspace, and
//! a user's effective permissions across the workspace group hierarchy.
//!
//! ```text
//! UI request → Directory → SnapshotCache ─(stale)→ UpstreamClient
//!                  ↓
//!          GroupHierarchy / PermissionResolver → Outcome<T>
//! ```
//!
//! The building blocks are re-exported as [`core`], [`upstream`], [`cache`],
//! [`resolver`], [`config`] and [`telemetry`].

#![doc(html_root_url = "https://docs.rs/groupscope/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod directory;
mod outcome;
mod views;

pub use groupscope_cache as cache;
pub use groupscope_config as config;
pub use groupscope_core as core;
pub use groupscope_resolver as resolver;
pub use groupscope_telemetry as telemetry;
pub use groupscope_upstream as upstream;

pub use directory::Directory;
pub use outcome::Outcome;
pub use views::{
    FieldFilter, TeamRoleStats, WorkspaceRef, WorkspaceUser, WorkspaceUserStats,
    PLACEHOLDER_CREATED_PREFIX, UNKNOWN_USER,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
