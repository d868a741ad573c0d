//! Service layer implementations.
//!
//! Services provide query views on top of the collector ports.

pub mod dashboard;

pub use dashboard::{CodeCount, DashboardService, MetricsSummary, RecentEvents};
