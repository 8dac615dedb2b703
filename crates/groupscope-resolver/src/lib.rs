//! # Groupscope Resolver
//!
//! Group hierarchy and effective permission resolution over a snapshot of
//! workspace groups and workspaces.
//!
//! - [`GroupHierarchy`] - Children by parent, group paths, derived workspace
//!   ownership and workspace annotation
//! - [`PermissionResolver`] - Effective permissions combining explicit grants
//!   with inherited group defaults
//! - [`build_tree`] - Nested, name-sorted group tree with depth levels
//!
//! # Example
//!
//! ```
//! use groupscope_core::{Permission, Workspace, WorkspaceGroup};
//! use groupscope_resolver::PermissionResolver;
//!
//! let groups = vec![
//!     WorkspaceGroup::new("a", "A").with_default(Permission::Read),
//!     WorkspaceGroup::new("b", "B").with_parent("a").with_default(Permission::Write),
//! ];
//! let workspaces = vec![Workspace::new("w", "W").in_group("b", "B")];
//!
//! let resolver = PermissionResolver::new(&groups, &workspaces);
//! let w = &resolver.workspaces()[0];
//! assert_eq!(resolver.workspace_permission("anyone", w), Permission::Write);
//! assert_eq!(resolver.hierarchy().group_path("b").path, "A > B");
//! ```

#![doc(html_root_url = "https://docs.rs/groupscope-resolver/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod access;
mod hierarchy;
mod tree;

pub use access::{GroupAccess, PermissionResolver, UserWorkspace, WorkspaceAccess};
pub use hierarchy::{Ancestors, GroupHierarchy, GroupPath, PATH_SEPARATOR, ROOT_KEY};
pub use tree::{build_tree, GroupItem, GroupNode};
