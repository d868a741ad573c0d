//! Point-in-time read view of collector state

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::ErrorEvent;
use crate::errors::Result;

/// Immutable copy of the collector state taken under a single lock
/// acquisition
///
/// A snapshot never observes later writes. It can be stale relative to
/// concurrent recorders but is always internally consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Cumulative events recorded since the last clear
    pub total_errors: u64,
    /// Per-code counts summed across live buckets
    pub error_counts: BTreeMap<i32, u64>,
    /// Recent events, oldest first
    pub recent_events: Vec<ErrorEvent>,
    /// Number of live buckets
    pub bucket_count: usize,
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
}

/// An error code with its count and 1-based rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedError {
    pub error_code: i32,
    pub count: u64,
    pub rank: usize,
}

/// Rank per-code counts, highest first, keeping at most `limit`
///
/// Ties are broken by ascending error code.
pub fn rank_error_counts(error_counts: &BTreeMap<i32, u64>, limit: usize) -> Vec<RankedError> {
    let mut ranked: Vec<(i32, u64)> =
        error_counts.iter().map(|(code, count)| (*code, *count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (error_code, count))| RankedError { error_code, count, rank: idx + 1 })
        .collect()
}

impl MetricsSnapshot {
    /// Aggregated count for `error_code`, zero when never seen
    pub fn count_for(&self, error_code: i32) -> u64 {
        self.error_counts.get(&error_code).copied().unwrap_or(0)
    }

    /// Highest-count codes, at most `limit` of them
    ///
    /// Ties are broken by ascending error code so the ranking is stable.
    pub fn top_errors(&self, limit: usize) -> Vec<RankedError> {
        rank_error_counts(&self.error_counts, limit)
    }

    /// Best-effort counts per transport status.
    ///
    /// Counted from the recent events; when there are none, error codes in the
    /// 400..600 range are assumed to mirror their HTTP status.
    pub fn status_counts(&self) -> BTreeMap<u16, u64> {
        let mut counts = BTreeMap::new();
        for event in &self.recent_events {
            *counts.entry(event.status_code).or_insert(0) += 1;
        }

        if counts.is_empty() {
            for (code, count) in &self.error_counts {
                if let Ok(status) = u16::try_from(*code) {
                    if (400..600).contains(&status) {
                        *counts.entry(status).or_insert(0) += count;
                    }
                }
            }
        }
        counts
    }

    /// Serialize to a JSON string
    ///
    /// # Errors
    /// Returns `FaultlineError::Serialization` if an event detail cannot be
    /// encoded.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
