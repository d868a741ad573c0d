//! Metrics exporters
//!
//! Exporters render collected error metrics for external monitoring systems.

pub mod prometheus;

// Re-export exporter types for convenience
pub use self::prometheus::PrometheusExporter;
