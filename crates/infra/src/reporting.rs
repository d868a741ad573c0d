//! Best-effort error reporting for request-path callers
//!
//! Exception-handling middleware must never let metrics recording change a
//! response. [`report_best_effort`] calls the sink and swallows both errors
//! and panics, logging them with `tracing::warn!`.
//!
//! ```
//! use std::sync::Arc;
//!
//! use faultline_core::ErrorMetricsCollector;
//! use faultline_domain::{ErrorRecord, MetricsConfig};
//! use faultline_infra::reporting::ErrorReporter;
//!
//! let collector = Arc::new(ErrorMetricsCollector::new(MetricsConfig::default()).unwrap());
//! let reporter = ErrorReporter::new(collector.clone(), true);
//!
//! let id = reporter.report(ErrorRecord::new(404, "NotFound", 404, "Resource not found"));
//! assert!(id.is_some());
//! assert_eq!(collector.total_events(), 1);
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use faultline_core::ErrorSink;
use faultline_domain::{ErrorRecord, MetricsConfig};

/// Record through `sink`, returning the event id on success
///
/// Failures and panics inside the sink are logged and turned into `None`.
pub fn report_best_effort(sink: &dyn ErrorSink, record: ErrorRecord) -> Option<String> {
    let error_code = record.error_code;
    match catch_unwind(AssertUnwindSafe(|| sink.record(record))) {
        Ok(Ok(event_id)) => Some(event_id),
        Ok(Err(err)) => {
            tracing::warn!(error_code, error = %err, "Failed to record error metric, dropping");
            None
        }
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(error_code, reason = %reason, "Error metric sink panicked, dropping");
            None
        }
    }
}

/// Shared handle that request handlers use to report errors
#[derive(Clone)]
pub struct ErrorReporter {
    sink: Arc<dyn ErrorSink>,
    enabled: bool,
}

impl std::fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorReporter").field("enabled", &self.enabled).finish_non_exhaustive()
    }
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn ErrorSink>, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    /// Reporter gated by `config.enabled`
    pub fn from_config(sink: Arc<dyn ErrorSink>, config: &MetricsConfig) -> Self {
        Self::new(sink, config.enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Report one error; `None` when disabled or when recording failed
    pub fn report(&self, record: ErrorRecord) -> Option<String> {
        if !self.enabled {
            return None;
        }
        report_best_effort(self.sink.as_ref(), record)
    }
}
