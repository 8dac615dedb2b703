//! The cached aggregate of the four upstream collections.

use std::time::Duration;

use chrono::{DateTime, Utc};
use groupscope_core::{Field, User, Workspace, WorkspaceGroup};
use tokio::time::Instant;

/// One consistent view of users, workspaces, groups and fields.
///
/// A snapshot is immutable once built: a refresh replaces it wholesale, so
/// readers holding an `Arc<Snapshot>` never observe a partial update.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Team members.
    pub users: Vec<User>,
    /// Non-archived workspaces.
    pub workspaces: Vec<Workspace>,
    /// Workspace groups.
    pub groups: Vec<WorkspaceGroup>,
    /// Field definitions, without workspace names.
    pub fields: Vec<Field>,
    /// Monotonic fetch time, used for TTL checks.
    pub fetched_at: Instant,
    /// Wall-clock fetch time, for display.
    pub refreshed_at: DateTime<Utc>,
}

impl Snapshot {
    /// Builds a snapshot stamped with the current time.
    #[must_use]
    pub fn new(
        users: Vec<User>,
        workspaces: Vec<Workspace>,
        groups: Vec<WorkspaceGroup>,
        fields: Vec<Field>,
    ) -> Self {
        Self {
            users,
            workspaces,
            groups,
            fields,
            fetched_at: Instant::now(),
            refreshed_at: Utc::now(),
        }
    }

    /// Time since the snapshot was fetched.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// True while `age <= ttl`.
    #[must_use]
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() <= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupscope_core::fixtures;

    #[tokio::test(start_paused = true)]
    async fn test_freshness_boundary() {
        let snapshot = Snapshot::new(fixtures::users(), Vec::new(), Vec::new(), Vec::new());
        let ttl = Duration::from_secs(300);
        assert!(snapshot.is_fresh(ttl));

        tokio::time::advance(ttl).await;
        assert!(snapshot.is_fresh(ttl), "age == ttl is still fresh");

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!snapshot.is_fresh(ttl));
    }
}
