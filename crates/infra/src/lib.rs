//! # Faultline Infrastructure
//!
//! Adapters around the in-process error metrics collector.
//!
//! This crate contains:
//! - Configuration loading from environment variables and files
//! - Prometheus text exposition of collector state
//! - Dashboard query service returning serializable read models
//! - Best-effort error reporting for request-path callers
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Reads through the `MetricsSource` port and writes through `ErrorSink`,
//!   both defined in `faultline-core`
//! - Contains all "impure" code (env, files, global subscriber)

pub mod config;
pub mod errors;
pub mod observability;
pub mod reporting;
pub mod services;

pub use observability::telemetry;

// Re-export commonly used items
pub use errors::InfraError;
pub use observability::exporters::PrometheusExporter;
pub use reporting::{report_best_effort, ErrorReporter};
pub use services::DashboardService;
