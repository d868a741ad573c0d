//! Domain types for error metrics
//!
//! - [`ErrorEvent`] / [`ErrorRecord`]: one error occurrence and its draft
//! - [`TimeBucket`]: fixed wall-clock window aggregate
//! - [`MetricsSnapshot`]: immutable point-in-time read view

pub mod bucket;
pub mod event;
pub mod snapshot;

pub use bucket::TimeBucket;
pub use event::{ErrorEvent, ErrorRecord};
pub use snapshot::{rank_error_counts, MetricsSnapshot, RankedError};
