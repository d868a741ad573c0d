//! Observability infrastructure: metric exposition and tracing setup
//!
//! - [`exporters::PrometheusExporter`] renders collector state in the
//!   Prometheus text format on demand
//! - [`telemetry::init_tracing`] installs the process-wide `tracing`
//!   subscriber

pub mod exporters;
pub mod telemetry;
