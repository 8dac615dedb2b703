//! Cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Calls answered from a fresh snapshot.
    pub hits: u64,
    /// Refreshes that committed a new snapshot.
    pub refreshes: u64,
    /// Refreshes that failed and left the snapshot untouched.
    pub failures: u64,
    /// Calls that waited on a refresh started by another call.
    pub joins: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    refreshes: AtomicU64,
    failures: AtomicU64,
    joins: AtomicU64,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        groupscope_telemetry::metrics::record_cache_hit();
    }

    pub(crate) fn refreshed(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        groupscope_telemetry::metrics::record_cache_refresh(true);
    }

    pub(crate) fn failed(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        groupscope_telemetry::metrics::record_cache_refresh(false);
    }

    pub(crate) fn joined(&self) {
        self.joins.fetch_add(1, Ordering::Relaxed);
        groupscope_telemetry::metrics::record_cache_refresh_join();
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            joins: self.joins.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let counters = Counters::default();
        counters.hit();
        counters.hit();
        counters.refreshed();
        counters.failed();
        counters.joined();
        assert_eq!(
            counters.snapshot(),
            CacheStats {
                hits: 2,
                refreshes: 1,
                failures: 1,
                joins: 1,
            }
        );
    }
}
