//! # Faultline Domain
//!
//! Data types and configuration for in-process error metrics.
//!
//! This crate contains:
//! - Error event, time bucket and snapshot types
//! - Metrics configuration, presets and validation
//! - Domain error types and Result definitions
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Faultline crates
//! - Only external dependencies allowed
//! - Pure data structures; synchronization lives in `faultline-core`

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{MetricsConfig, MetricsConfigBuilder};
pub use errors::*;
pub use types::{
    rank_error_counts, ErrorEvent, ErrorRecord, MetricsSnapshot, RankedError, TimeBucket,
};
