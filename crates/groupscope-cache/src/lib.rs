//! # Groupscope Cache
//!
//! The snapshot cache: users, workspaces, workspace groups and fields
//! fetched together from a [`groupscope_upstream::CollectionSource`] and kept
//! for a TTL (five minutes by default).
//!
//! - [`SnapshotCache`] - TTL check, single-flight refresh, atomic swap
//! - [`Snapshot`] - One immutable, all-or-nothing view of the four collections
//! - [`CacheStats`] - Hit / refresh / failure / join counters
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use groupscope_cache::{CacheConfig, SnapshotCache};
//! use groupscope_core::{ApiToken, RequestContext};
//! use groupscope_upstream::MemorySource;
//!
//! # tokio_test::block_on(async {
//! let cache = SnapshotCache::new(
//!     Arc::new(MemorySource::from_fixtures()),
//!     ApiToken::new("token").unwrap(),
//!     CacheConfig::default(),
//! );
//! let snapshot = cache.ensure_fresh(&RequestContext::new()).await.unwrap();
//! assert_eq!(snapshot.users.len(), 3);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/groupscope-cache/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod snapshot;
mod stats;

pub use cache::{CacheConfig, SnapshotCache, DEFAULT_TTL};
pub use snapshot::Snapshot;
pub use stats::CacheStats;
