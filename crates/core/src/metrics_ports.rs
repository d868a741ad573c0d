//! Error metrics ports - the write and read contracts of the collector
//!
//! Exception-handling middleware depends on [`ErrorSink`]; exporters and
//! dashboards depend on [`MetricsSource`]. Neither needs to know about the
//! concrete collector, which keeps per-tenant collectors and test doubles
//! straightforward.

use std::collections::BTreeMap;

use faultline_domain::{ErrorEvent, ErrorRecord, MetricsSnapshot, Result, TimeBucket};

/// Write side: accepts error records
///
/// The in-process collector never fails, but other sinks (forwarders,
/// decorators) may. Callers on a request path must treat failures as
/// non-fatal and never let them alter the response.
pub trait ErrorSink: Send + Sync {
    /// Record one error and return its event id
    fn record(&self, record: ErrorRecord) -> Result<String>;
}

/// Read side: point-in-time views of aggregated state
pub trait MetricsSource: Send + Sync {
    /// Consistent copy of the current state
    fn get_snapshot(&self) -> MetricsSnapshot;

    /// Per-code counts across live buckets
    fn get_error_counts_by_code(&self) -> BTreeMap<i32, u64> {
        self.get_snapshot().error_counts
    }

    /// Up to `limit` most recent events, newest first. Non-positive limits
    /// yield an empty list.
    fn get_recent_events(&self, limit: i64) -> Vec<ErrorEvent>;

    /// Copies of all live buckets, oldest first
    fn get_buckets(&self) -> Vec<TimeBucket>;
}
