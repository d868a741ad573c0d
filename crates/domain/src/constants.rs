//! Domain constants
//!
//! Centralized location for limits and defaults shared by the collector and
//! its adapters.

// Configuration bounds
pub const MIN_COLLECTION_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_COLLECTION_INTERVAL_MS: u64 = 60_000;
pub const MIN_MAX_EVENTS: usize = 100;
pub const MAX_MAX_EVENTS: usize = 1_000_000;
pub const DEFAULT_MAX_EVENTS: usize = 10_000;
pub const DEFAULT_PROMETHEUS_NAMESPACE: &str = "faultline";

// Collector internals
pub const RECENT_EVENTS_CAPACITY: usize = 1_000;
/// Upper bound for bucket start alignment, in milliseconds.
pub const BUCKET_ALIGNMENT_MS: u64 = 10_000;
/// Eviction stops once the retained estimate is at or below this share of
/// `max_events` (numerator / denominator).
pub const EVICTION_TARGET_NUMERATOR: usize = 9;
pub const EVICTION_TARGET_DENOMINATOR: usize = 10;

// Dashboard query limits
pub const DEFAULT_RECENT_LIMIT: usize = 100;
pub const MAX_RECENT_LIMIT: usize = 1_000;
pub const DEFAULT_TOP_ERRORS_LIMIT: usize = 10;
pub const MAX_TOP_ERRORS_LIMIT: usize = 100;
