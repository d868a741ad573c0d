//! Dashboard query service.
//!
//! Serializable read models for a metrics dashboard. The service is transport
//! agnostic: an HTTP layer maps each method to a route and serializes the
//! returned value as JSON.
//!
//! | Query          | Limit bounds | Default |
//! |----------------|--------------|---------|
//! | `recent`       | 1..=1000     | 100     |
//! | `top_errors`   | 1..=100      | 10      |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use faultline_core::ErrorMetricsCollector;
//! use faultline_domain::{ErrorRecord, MetricsConfig};
//! use faultline_infra::services::DashboardService;
//!
//! let collector = Arc::new(ErrorMetricsCollector::new(MetricsConfig::default()).unwrap());
//! collector.record(ErrorRecord::new(404, "NotFound", 404, "Resource not found"));
//!
//! let dashboard = DashboardService::new(collector);
//! assert_eq!(dashboard.summary().total_errors, 1);
//! assert_eq!(dashboard.by_code(404).count, 1);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use faultline_core::{Clock, MetricsSource, SystemClock};
use faultline_domain::constants::{MAX_RECENT_LIMIT, MAX_TOP_ERRORS_LIMIT};
use faultline_domain::{rank_error_counts, ErrorEvent, FaultlineError, RankedError, Result};
use serde::{Deserialize, Serialize};

/// Summary of current metrics state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_errors: u64,
    pub error_counts: BTreeMap<i32, u64>,
    pub bucket_count: usize,
    pub timestamp: DateTime<Utc>,
}

/// Recent error events, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEvents {
    pub events: Vec<ErrorEvent>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

/// Aggregated count for a single error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCount {
    pub error_code: i32,
    pub count: u64,
    pub timestamp: DateTime<Utc>,
}

/// Read-only dashboard queries over a [`MetricsSource`]
pub struct DashboardService<C: Clock = SystemClock> {
    source: Arc<dyn MetricsSource>,
    clock: C,
}

impl<C: Clock> std::fmt::Debug for DashboardService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService").finish_non_exhaustive()
    }
}

impl DashboardService<SystemClock> {
    /// Create a dashboard service reading from `source`
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        Self::with_clock(source, SystemClock)
    }
}

impl<C: Clock> DashboardService<C> {
    /// Create a dashboard service with a custom clock for response
    /// timestamps
    pub fn with_clock(source: Arc<dyn MetricsSource>, clock: C) -> Self {
        Self { source, clock }
    }

    /// Totals, per-code counts and bucket count from one snapshot
    pub fn summary(&self) -> MetricsSummary {
        let snapshot = self.source.get_snapshot();
        MetricsSummary {
            total_errors: snapshot.total_errors,
            error_counts: snapshot.error_counts,
            bucket_count: snapshot.bucket_count,
            timestamp: snapshot.timestamp,
        }
    }

    /// Up to `limit` most recent events, newest first
    ///
    /// # Errors
    /// Returns `FaultlineError::InvalidInput` unless `1 <= limit <= 1000`.
    pub fn recent(&self, limit: i64) -> Result<RecentEvents> {
        check_limit("limit", limit, MAX_RECENT_LIMIT)?;
        let events = self.source.get_recent_events(limit);
        Ok(RecentEvents { count: events.len(), events, timestamp: self.clock.now() })
    }

    /// Count for one error code, zero when never seen
    pub fn by_code(&self, error_code: i32) -> CodeCount {
        let count = self.source.get_error_counts_by_code().get(&error_code).copied().unwrap_or(0);
        CodeCount { error_code, count, timestamp: self.clock.now() }
    }

    /// Highest-count codes with 1-based ranks
    ///
    /// # Errors
    /// Returns `FaultlineError::InvalidInput` unless `1 <= limit <= 100`.
    pub fn top_errors(&self, limit: i64) -> Result<Vec<RankedError>> {
        let limit = check_limit("limit", limit, MAX_TOP_ERRORS_LIMIT)?;
        Ok(rank_error_counts(&self.source.get_error_counts_by_code(), limit))
    }
}

fn check_limit(name: &str, value: i64, max: usize) -> Result<usize> {
    match usize::try_from(value) {
        Ok(limit) if (1..=max).contains(&limit) => Ok(limit),
        _ => Err(FaultlineError::InvalidInput(format!(
            "{name} must be between 1 and {max}, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for services::dashboard.
    use chrono::TimeZone;
    use faultline_core::{ErrorMetricsCollector, ManualClock};
    use faultline_domain::{ErrorRecord, MetricsConfig};

    use super::*;

    fn fixture() -> (Arc<ErrorMetricsCollector<ManualClock>>, DashboardService<ManualClock>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        let collector = Arc::new(
            ErrorMetricsCollector::with_clock(MetricsConfig::default(), clock.clone()).unwrap(),
        );
        let dashboard = DashboardService::with_clock(collector.clone(), clock);
        (collector, dashboard)
    }

    fn record(collector: &ErrorMetricsCollector<ManualClock>, code: i32, times: usize) {
        for i in 0..times {
            collector.record(ErrorRecord::new(code, "E", 400, format!("{code}-{i}")));
        }
    }

    #[test]
    fn test_summary_mirrors_snapshot() {
        let (collector, dashboard) = fixture();
        record(&collector, 404, 2);
        record(&collector, 500, 1);

        let summary = dashboard.summary();
        assert_eq!(summary.total_errors, 3);
        assert_eq!(summary.error_counts.get(&404), Some(&2));
        assert_eq!(summary.bucket_count, 1);
        assert_eq!(summary.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    }

    /// Validates limit bounds and ordering of `recent`.
    ///
    /// Assertions:
    /// - 0 and 1001 are rejected as invalid input.
    /// - Events come back newest first with a matching `count`.
    #[test]
    fn test_recent_bounds_and_order() {
        let (collector, dashboard) = fixture();
        record(&collector, 400, 4);

        assert!(matches!(dashboard.recent(0), Err(FaultlineError::InvalidInput(_))));
        assert!(matches!(dashboard.recent(1001), Err(FaultlineError::InvalidInput(_))));
        assert!(matches!(dashboard.recent(-3), Err(FaultlineError::InvalidInput(_))));

        let recent = dashboard.recent(3).unwrap();
        assert_eq!(recent.count, 3);
        assert_eq!(recent.events[0].message, "400-3");
        assert_eq!(recent.events[2].message, "400-1");
        assert_eq!(dashboard.recent(1000).unwrap().count, 4);
    }

    #[test]
    fn test_by_code_unknown_is_zero() {
        let (collector, dashboard) = fixture();
        record(&collector, 404, 2);

        assert_eq!(dashboard.by_code(404).count, 2);
        let missing = dashboard.by_code(9999);
        assert_eq!(missing.error_code, 9999);
        assert_eq!(missing.count, 0);
    }

    /// Validates ranking and limit checks of `top_errors`.
    #[test]
    fn test_top_errors_ranking() {
        let (collector, dashboard) = fixture();
        record(&collector, 500, 1);
        record(&collector, 404, 5);
        record(&collector, 401, 3);

        let top = dashboard.top_errors(2).unwrap();
        assert_eq!(
            top,
            vec![
                RankedError { error_code: 404, count: 5, rank: 1 },
                RankedError { error_code: 401, count: 3, rank: 2 },
            ]
        );
        assert!(matches!(dashboard.top_errors(0), Err(FaultlineError::InvalidInput(_))));
        assert!(matches!(dashboard.top_errors(101), Err(FaultlineError::InvalidInput(_))));
        assert_eq!(dashboard.top_errors(100).unwrap().len(), 3);
    }

    #[test]
    fn test_recent_events_serialize_as_json() {
        let (collector, dashboard) = fixture();
        record(&collector, 404, 1);

        let value = serde_json::to_value(dashboard.recent(10).unwrap()).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["events"][0]["error_code"], 404);
        assert_eq!(value["timestamp"], "2024-05-01T08:00:00Z");
    }
}
