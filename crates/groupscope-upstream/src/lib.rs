//! # Groupscope Upstream
//!
//! The upstream gateway: authenticated HTTP calls against the Airfocus API for
//! users, workspaces, workspace groups and fields, decoded into the
//! `groupscope-core` records.
//!
//! - [`CollectionSource`] - The fetch contract consumed by the snapshot cache
//! - [`UpstreamClient`] - `reqwest` implementation of that contract
//! - [`query`] - Request and response bodies of the search endpoints
//! - [`MemorySource`] - In-memory source for tests and offline use
//!
//! Failures map onto [`groupscope_core::GroupscopeError`]: non-2xx statuses
//! become `Upstream` with the status and body, malformed JSON becomes
//! `Decode`, connection problems become `Transport`. Nothing is retried.

#![doc(html_root_url = "https://docs.rs/groupscope-upstream/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod memory;
pub mod query;
mod source;

pub use client::UpstreamClient;
pub use memory::{Collection, MemorySource};
pub use source::CollectionSource;
