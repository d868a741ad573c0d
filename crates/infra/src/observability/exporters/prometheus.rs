//! Prometheus text exposition of error metrics
//!
//! Renders a fresh [`MetricsSource`] snapshot on every call; nothing is
//! registered in the process-global registry, so several exporters (one per
//! collector) can coexist.
//!
//! ## Exposed metrics
//! ```text
//! # HELP <ns>_errors_total Total number of application errors
//! # TYPE <ns>_errors_total counter
//! <ns>_errors_total 42
//! # HELP <ns>_errors_by_code Errors grouped by application error code
//! # TYPE <ns>_errors_by_code gauge
//! <ns>_errors_by_code{error_code="404"} 10
//! # HELP <ns>_errors_by_status Errors grouped by HTTP status code
//! # TYPE <ns>_errors_by_status gauge
//! <ns>_errors_by_status{status_code="404"} 10
//! ```
//! Families without samples are omitted from the output.

use std::sync::Arc;

use ::prometheus::{Encoder, IntCounter, IntGaugeVec, Opts, Registry, TextEncoder};
use faultline_core::MetricsSource;
use faultline_domain::{MetricsConfig, MetricsSnapshot, Result};

use crate::errors::InfraError;

/// On-demand Prometheus exporter over a metrics source
pub struct PrometheusExporter {
    source: Arc<dyn MetricsSource>,
    enabled: bool,
    namespace: String,
}

impl std::fmt::Debug for PrometheusExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusExporter")
            .field("enabled", &self.enabled)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl PrometheusExporter {
    /// Create an exporter reading from `source`
    pub fn new(source: Arc<dyn MetricsSource>, enabled: bool, namespace: impl Into<String>) -> Self {
        Self { source, enabled, namespace: namespace.into() }
    }

    /// Create an exporter using `prometheus_enabled` and
    /// `prometheus_namespace` from `config`
    pub fn from_config(source: Arc<dyn MetricsSource>, config: &MetricsConfig) -> Self {
        Self::new(source, config.prometheus_enabled, config.prometheus_namespace.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Render the current state in the Prometheus text format
    ///
    /// Returns an empty string when the exporter is disabled.
    ///
    /// # Errors
    /// Returns `FaultlineError::Export` if a metric cannot be built or
    /// encoded (for example an invalid namespace).
    pub fn generate_metrics(&self) -> Result<String> {
        if !self.enabled {
            return Ok(String::new());
        }

        let snapshot = self.source.get_snapshot();
        let registry = self.build_registry(&snapshot).map_err(InfraError::from)?;

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer).map_err(InfraError::from)?;
        Ok(String::from_utf8(buffer).map_err(InfraError::from)?)
    }

    /// Content type of [`generate_metrics`](Self::generate_metrics) output
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    fn build_registry(
        &self,
        snapshot: &MetricsSnapshot,
    ) -> std::result::Result<Registry, ::prometheus::Error> {
        let registry = Registry::new();

        let total = IntCounter::with_opts(
            Opts::new("errors_total", "Total number of application errors")
                .namespace(self.namespace.as_str()),
        )?;
        total.inc_by(snapshot.total_errors);
        registry.register(Box::new(total))?;

        let by_code = IntGaugeVec::new(
            Opts::new("errors_by_code", "Errors grouped by application error code")
                .namespace(self.namespace.as_str()),
            &["error_code"],
        )?;
        for (code, count) in &snapshot.error_counts {
            by_code.with_label_values(&[code.to_string().as_str()]).set(gauge_value(*count));
        }
        registry.register(Box::new(by_code))?;

        let status_counts = snapshot.status_counts();
        if !status_counts.is_empty() {
            let by_status = IntGaugeVec::new(
                Opts::new("errors_by_status", "Errors grouped by HTTP status code")
                    .namespace(self.namespace.as_str()),
                &["status_code"],
            )?;
            for (status, count) in &status_counts {
                by_status
                    .with_label_values(&[status.to_string().as_str()])
                    .set(gauge_value(*count));
            }
            registry.register(Box::new(by_status))?;
        }

        Ok(registry)
    }
}

fn gauge_value(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
