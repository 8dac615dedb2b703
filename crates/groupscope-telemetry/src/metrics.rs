//! Metrics for Groupscope.
//!
//! Recorded through the `metrics` facade. This crate installs no exporter:
//! without a recorder every call is a no-op, and an embedding server can
//! install whichever exporter it already uses.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `groupscope_upstream_requests_total` | Counter | `collection`, `outcome` | Upstream API calls |
//! | `groupscope_upstream_request_duration_seconds` | Histogram | `collection` | Upstream latency |
//! | `groupscope_cache_hits_total` | Counter | - | Reads served without a refresh |
//! | `groupscope_cache_refreshes_total` | Counter | `outcome` | Snapshot refresh attempts |
//! | `groupscope_cache_refresh_joins_total` | Counter | - | Callers that joined an in-flight refresh |

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Upstream request counter.
pub const UPSTREAM_REQUESTS: &str = "groupscope_upstream_requests_total";
/// Upstream latency histogram.
pub const UPSTREAM_DURATION: &str = "groupscope_upstream_request_duration_seconds";
/// Cache hit counter.
pub const CACHE_HITS: &str = "groupscope_cache_hits_total";
/// Cache refresh counter.
pub const CACHE_REFRESHES: &str = "groupscope_cache_refreshes_total";
/// Joined refresh counter.
pub const CACHE_REFRESH_JOINS: &str = "groupscope_cache_refresh_joins_total";

/// Registers descriptions for all metrics with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(UPSTREAM_REQUESTS, "Upstream API calls by collection and outcome");
    describe_histogram!(UPSTREAM_DURATION, "Upstream API call duration in seconds");
    describe_counter!(CACHE_HITS, "Snapshot reads served without a refresh");
    describe_counter!(CACHE_REFRESHES, "Snapshot refresh attempts by outcome");
    describe_counter!(
        CACHE_REFRESH_JOINS,
        "Callers that waited on a refresh started by another caller"
    );
}

/// Records one upstream call.
///
/// `outcome` is `"success"` or an error category name.
pub fn record_upstream_request(collection: &'static str, outcome: &'static str, duration: Duration) {
    counter!(UPSTREAM_REQUESTS, "collection" => collection, "outcome" => outcome).increment(1);
    histogram!(UPSTREAM_DURATION, "collection" => collection).record(duration.as_secs_f64());
}

/// Records a read served from a fresh snapshot.
pub fn record_cache_hit() {
    counter!(CACHE_HITS).increment(1);
}

/// Records the end of a refresh attempt.
pub fn record_cache_refresh(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(CACHE_REFRESHES, "outcome" => outcome).increment(1);
}

/// Records a caller that joined an in-flight refresh.
pub fn record_cache_refresh_join() {
    counter!(CACHE_REFRESH_JOINS).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_functions_without_recorder() {
        describe_metrics();
        record_upstream_request("users", "success", Duration::from_millis(12));
        record_upstream_request("fields", "upstream", Duration::from_millis(3));
        record_cache_hit();
        record_cache_refresh(true);
        record_cache_refresh(false);
        record_cache_refresh_join();
    }

    #[test]
    fn test_metric_names() {
        assert!(UPSTREAM_REQUESTS.starts_with("groupscope_"));
        assert!(CACHE_REFRESHES.ends_with("_total"));
    }
}
