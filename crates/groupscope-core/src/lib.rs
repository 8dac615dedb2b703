//! # Groupscope Core
//!
//! Core types for Groupscope, a cache and permission-resolution engine over
//! the Airfocus project-management API.
//!
//! This crate provides the foundational types used throughout Groupscope:
//!
//! - [`User`], [`Workspace`], [`WorkspaceGroup`], [`Field`] - Upstream records
//! - [`TeamLicense`] - License state and seat usage of the team
//! - [`Permission`] / [`PermissionMap`] - Ordered access levels and grant maps
//! - [`RequestContext`] - Per-request cancellation, deadline and request ID
//! - [`ApiToken`] - Redacting wrapper for the caller's bearer token
//! - [`GroupscopeError`] - Standard error types

#![doc(html_root_url = "https://docs.rs/groupscope-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
pub mod field;
pub mod fixtures;
pub mod license;
pub mod permission;
mod serde_util;
mod token;
pub mod user;
pub mod workspace;

pub use context::{RequestContext, RequestId};
pub use error::{ErrorCategory, ErrorResponse, GroupscopeError, GroupscopeResult};
pub use field::{Field, FieldScope, FieldWorkspace, NamedField};
pub use license::{SeatCount, Seats, TeamLicense};
pub use permission::{Permission, PermissionMap};
pub use token::ApiToken;
pub use user::{User, UserRole, UserState};
pub use workspace::{workspace_names, Workspace, WorkspaceGroup, WorkspaceNames};
