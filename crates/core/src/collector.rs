//! Thread-safe error metrics collector with time buckets and bucket-level
//! eviction
//!
//! ## Design
//! - **Single mutex** guards buckets, the recent-events ring and both
//!   counters; every operation is one lock acquisition
//! - **Poison-safe locking** with explicit recovery (no `.expect()`)
//! - **VecDeque ordered by start time** for O(1) oldest-bucket eviction
//! - **VecDeque ring buffer** of the last 1000 events, O(1) trimming
//! - **Two counters**: `total_events` is the cumulative count since the last
//!   clear; `retained_events` is the working-set estimate over live buckets
//!   that eviction acts on. They diverge as buckets expire or are evicted.
//!
//! ## Bucket windows
//! A new bucket is opened only when there is none or "now" has passed the
//! current bucket's end. Its start is "now" truncated to a multiple of
//! `min(collection_interval, 10s)` since the Unix epoch, and it spans
//! `collection_interval`. Successive bucket starts are therefore strictly
//! increasing. The expiry sweep and the `max_events` check run only at that
//! point, once per interval rather than once per call.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use faultline_domain::constants::{
    BUCKET_ALIGNMENT_MS, EVICTION_TARGET_DENOMINATOR, EVICTION_TARGET_NUMERATOR,
    RECENT_EVENTS_CAPACITY,
};
use faultline_domain::{
    ErrorEvent, ErrorRecord, MetricsConfig, MetricsSnapshot, Result, TimeBucket,
};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::metrics_ports::{ErrorSink, MetricsSource};

/// Mutable collector state, only touched under the collector mutex
#[derive(Debug, Default)]
struct CollectorState {
    total_events: u64,
    retained_events: u64,
    /// Live buckets, oldest at the front; the back is the current bucket
    buckets: VecDeque<TimeBucket>,
    recent_events: VecDeque<ErrorEvent>,
}

impl CollectorState {
    fn needs_new_bucket(&self, now: DateTime<Utc>) -> bool {
        self.buckets.back().map_or(true, |current| now > current.end_time())
    }

    fn open_bucket(&mut self, now: DateTime<Utc>, config: &MetricsConfig) {
        let start = aligned_start(now, config.collection_interval_ms);
        self.buckets.push_back(TimeBucket::new(start, config.bucket_duration()));

        let expired = self.sweep_expired(now);
        let evicted = self.enforce_max_events(config.max_events);

        debug!(
            bucket_start = %start,
            expired,
            evicted,
            live_buckets = self.buckets.len(),
            retained_events = self.retained_events,
            "Opened error metrics bucket"
        );
    }

    /// Drop every bucket whose window ended before `now`.
    fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.buckets.len();
        let mut dropped_events = 0u64;
        self.buckets.retain(|bucket| {
            if bucket.is_expired(now) {
                dropped_events += bucket.total_count();
                false
            } else {
                true
            }
        });
        self.retained_events = self.retained_events.saturating_sub(dropped_events);
        before - self.buckets.len()
    }

    /// Evict whole buckets, oldest first, once the retained estimate exceeds
    /// `max_events`, until it is at or below 90% of it. The newest bucket is
    /// never evicted.
    fn enforce_max_events(&mut self, max_events: usize) -> usize {
        let max_events = u64::try_from(max_events).unwrap_or(u64::MAX);
        if self.retained_events <= max_events {
            return 0;
        }

        let numerator = EVICTION_TARGET_NUMERATOR as u64;
        let denominator = EVICTION_TARGET_DENOMINATOR as u64;
        let mut evicted = 0;
        while self.retained_events.saturating_mul(denominator)
            > max_events.saturating_mul(numerator)
            && self.buckets.len() > 1
        {
            let Some(oldest) = self.buckets.pop_front() else {
                break;
            };
            self.retained_events = self.retained_events.saturating_sub(oldest.total_count());
            evicted += 1;
        }
        evicted
    }

    fn push_recent(&mut self, event: ErrorEvent) {
        self.recent_events.push_back(event);
        if self.recent_events.len() > RECENT_EVENTS_CAPACITY {
            self.recent_events.pop_front();
        }
    }
}

/// Start of the window containing `now`, aligned to
/// `min(interval_ms, BUCKET_ALIGNMENT_MS)` since the epoch.
fn aligned_start(now: DateTime<Utc>, interval_ms: u64) -> DateTime<Utc> {
    let alignment = i64::try_from(interval_ms.clamp(1, BUCKET_ALIGNMENT_MS)).unwrap_or(1);
    let millis = now.timestamp_millis();
    let aligned = millis - millis.rem_euclid(alignment);
    DateTime::<Utc>::from_timestamp_millis(aligned).unwrap_or(now)
}

/// Process-local error metrics aggregator
///
/// Construct once at startup and share it (for example behind an `Arc`) with
/// every request handler. All methods take `&self`.
///
/// # Example
/// ```
/// use faultline_core::ErrorMetricsCollector;
/// use faultline_domain::{ErrorRecord, MetricsConfig};
///
/// let collector = ErrorMetricsCollector::new(MetricsConfig::default())?;
/// let event_id = collector.record(
///     ErrorRecord::new(404, "NotFound", 404, "Resource not found")
///         .with_path("/api/users/123")
///         .with_method("GET"),
/// );
/// assert!(!event_id.is_empty());
///
/// let snapshot = collector.get_snapshot();
/// assert_eq!(snapshot.total_errors, 1);
/// assert_eq!(snapshot.count_for(404), 1);
/// # Ok::<(), faultline_domain::FaultlineError>(())
/// ```
#[derive(Debug)]
pub struct ErrorMetricsCollector<C: Clock = SystemClock> {
    config: MetricsConfig,
    state: Mutex<CollectorState>,
    clock: C,
}

impl ErrorMetricsCollector<SystemClock> {
    /// Create a collector backed by the system clock
    ///
    /// # Errors
    /// Returns `FaultlineError::Config` if `config` fails validation.
    pub fn new(config: MetricsConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ErrorMetricsCollector<C> {
    /// Create a collector with a custom clock (useful for testing)
    ///
    /// # Errors
    /// Returns `FaultlineError::Config` if `config` fails validation.
    pub fn with_clock(config: MetricsConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, state: Mutex::new(CollectorState::default()), clock })
    }

    /// Configuration the collector was built with
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Record one error event and return its id
    ///
    /// Never fails. Inputs are stored as given; validating error codes is the
    /// caller's business.
    pub fn record(&self, record: ErrorRecord) -> String {
        let event = ErrorEvent::from_record(record, self.clock.now());
        let event_id = event.event_id.clone();

        let mut state = self.lock_state();
        let now = self.clock.now();
        if state.needs_new_bucket(now) {
            state.open_bucket(now, &self.config);
        }

        if let Some(current) = state.buckets.back_mut() {
            current.add_event(&event);
        }
        state.retained_events += 1;
        state.total_events += 1;
        state.push_recent(event);

        event_id
    }

    /// Consistent copy of the current state
    pub fn get_snapshot(&self) -> MetricsSnapshot {
        let state = self.lock_state();

        let mut error_counts = BTreeMap::new();
        for bucket in &state.buckets {
            for (code, count) in bucket.error_counts() {
                *error_counts.entry(*code).or_insert(0) += count;
            }
        }

        MetricsSnapshot {
            total_errors: state.total_events,
            error_counts,
            recent_events: state.recent_events.iter().cloned().collect(),
            bucket_count: state.buckets.len(),
            timestamp: self.clock.now(),
        }
    }

    /// Per-code counts across live buckets
    pub fn get_error_counts_by_code(&self) -> BTreeMap<i32, u64> {
        self.get_snapshot().error_counts
    }

    /// Up to `limit` most recent events, newest first
    ///
    /// Non-positive limits yield an empty list.
    pub fn get_recent_events(&self, limit: i64) -> Vec<ErrorEvent> {
        let Ok(limit) = usize::try_from(limit) else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let state = self.lock_state();
        state.recent_events.iter().rev().take(limit).cloned().collect()
    }

    /// Copies of all live buckets, oldest first
    pub fn get_buckets(&self) -> Vec<TimeBucket> {
        self.lock_state().buckets.iter().cloned().collect()
    }

    /// Cumulative events recorded since the last [`clear`](Self::clear)
    pub fn total_events(&self) -> u64 {
        self.lock_state().total_events
    }

    /// Events currently held across live buckets; the estimate eviction
    /// keeps near `max_events`
    pub fn retained_events(&self) -> u64 {
        self.lock_state().retained_events
    }

    /// Reset to the freshly constructed state
    pub fn clear(&self) {
        let mut state = self.lock_state();
        *state = CollectorState::default();
    }

    fn lock_state(&self) -> MutexGuard<'_, CollectorState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poison_err) => {
                tracing::warn!(
                    metric = "ErrorMetricsCollector::state",
                    "Mutex poisoned, recovering collector state"
                );
                poison_err.into_inner()
            }
        }
    }
}

impl<C: Clock> ErrorSink for ErrorMetricsCollector<C> {
    fn record(&self, record: ErrorRecord) -> Result<String> {
        Ok(ErrorMetricsCollector::record(self, record))
    }
}

impl<C: Clock> MetricsSource for ErrorMetricsCollector<C> {
    fn get_snapshot(&self) -> MetricsSnapshot {
        ErrorMetricsCollector::get_snapshot(self)
    }

    fn get_error_counts_by_code(&self) -> BTreeMap<i32, u64> {
        ErrorMetricsCollector::get_error_counts_by_code(self)
    }

    fn get_recent_events(&self, limit: i64) -> Vec<ErrorEvent> {
        ErrorMetricsCollector::get_recent_events(self, limit)
    }

    fn get_buckets(&self) -> Vec<TimeBucket> {
        ErrorMetricsCollector::get_buckets(self)
    }
}
