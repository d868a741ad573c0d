//! Fixed wall-clock window aggregate

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::ErrorEvent;

/// Error counts for the half-open window `[start_time, end_time)`
///
/// Window boundaries are fixed at creation; counts only grow through
/// [`TimeBucket::add_event`], which keeps `total_count` equal to the sum of
/// `error_counts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    error_counts: BTreeMap<i32, u64>,
    total_count: u64,
}

impl TimeBucket {
    /// Create an empty bucket starting at `start_time` and spanning `width`.
    ///
    /// Widths beyond chrono's range saturate to the maximum representable
    /// instant.
    pub fn new(start_time: DateTime<Utc>, width: Duration) -> Self {
        let end_time = chrono::Duration::from_std(width)
            .ok()
            .and_then(|width| start_time.checked_add_signed(width))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start_time, end_time, error_counts: BTreeMap::new(), total_count: 0 }
    }

    /// Count one event against this window.
    #[inline]
    pub fn add_event(&mut self, event: &ErrorEvent) {
        *self.error_counts.entry(event.error_code).or_insert(0) += 1;
        self.total_count += 1;
    }

    /// `true` once `now` is past `end_time`.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Per-code counts, ordered by code
    pub fn error_counts(&self) -> &BTreeMap<i32, u64> {
        &self.error_counts
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for types::bucket.
    use chrono::TimeZone;

    use super::*;
    use crate::types::ErrorRecord;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 10).unwrap()
    }

    fn event(code: i32) -> ErrorEvent {
        ErrorEvent::from_record(ErrorRecord::new(code, "E", 500, "m"), start())
    }

    #[test]
    fn test_new_bucket_window() {
        let bucket = TimeBucket::new(start(), Duration::from_secs(60));
        assert_eq!(bucket.start_time(), start());
        assert_eq!(bucket.end_time(), start() + chrono::Duration::seconds(60));
        assert_eq!(bucket.total_count(), 0);
        assert!(bucket.error_counts().is_empty());
    }

    /// Validates `add_event` keeps totals consistent with per-code counts.
    ///
    /// Assertions:
    /// - Per-code counts match what was added.
    /// - `total_count` equals the sum of per-code counts.
    #[test]
    fn test_add_event_counts() {
        let mut bucket = TimeBucket::new(start(), Duration::from_secs(60));
        for code in [404, 404, 500, 404, 401] {
            bucket.add_event(&event(code));
        }

        assert_eq!(bucket.error_counts().get(&404), Some(&3));
        assert_eq!(bucket.error_counts().get(&500), Some(&1));
        assert_eq!(bucket.error_counts().get(&401), Some(&1));
        assert_eq!(bucket.total_count(), 5);
        assert_eq!(bucket.error_counts().values().sum::<u64>(), bucket.total_count());
    }

    /// The window end itself is still live; only later instants expire it.
    #[test]
    fn test_is_expired_boundary() {
        let bucket = TimeBucket::new(start(), Duration::from_secs(10));
        let end = bucket.end_time();

        assert!(!bucket.is_expired(start()));
        assert!(!bucket.is_expired(end));
        assert!(bucket.is_expired(end + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_huge_width_saturates() {
        let bucket = TimeBucket::new(start(), Duration::from_secs(u64::MAX));
        assert_eq!(bucket.end_time(), DateTime::<Utc>::MAX_UTC);
        assert!(!bucket.is_expired(start()));
    }
}
