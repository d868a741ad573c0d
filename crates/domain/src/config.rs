//! Metrics configuration types and builder
//!
//! [`MetricsConfig`] is validated once, when the collector is constructed or
//! when the builder finishes. Out-of-range values are rejected rather than
//! clamped so a misconfigured service fails at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COLLECTION_INTERVAL_MS, DEFAULT_MAX_EVENTS, DEFAULT_PROMETHEUS_NAMESPACE,
    MAX_MAX_EVENTS, MIN_COLLECTION_INTERVAL_MS, MIN_MAX_EVENTS,
};
use crate::errors::{FaultlineError, Result};

/// Configuration for error metrics collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Whether errors should be recorded at all
    pub enabled: bool,

    /// Width of each aggregation bucket in milliseconds (min 1000)
    pub collection_interval_ms: u64,

    /// Soft cap on events retained across live buckets (100..=1_000_000)
    pub max_events: usize,

    /// Whether the Prometheus text exposition is produced
    pub prometheus_enabled: bool,

    /// Metric name prefix for the Prometheus exposition
    pub prometheus_namespace: String,

    /// Whether dashboard queries are served
    pub dashboard_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collection_interval_ms: DEFAULT_COLLECTION_INTERVAL_MS,
            max_events: DEFAULT_MAX_EVENTS,
            prometheus_enabled: true,
            prometheus_namespace: DEFAULT_PROMETHEUS_NAMESPACE.to_string(),
            dashboard_enabled: true,
        }
    }
}

impl MetricsConfig {
    /// Create a new configuration builder
    pub fn builder() -> MetricsConfigBuilder {
        MetricsConfigBuilder::default()
    }

    /// Local development: one-minute buckets, small working set.
    pub fn development() -> Self {
        Self { collection_interval_ms: 60_000, max_events: 1_000, ..Self::default() }
    }

    /// Production: 30-second buckets, large working set.
    pub fn production() -> Self {
        Self { collection_interval_ms: 30_000, max_events: 50_000, ..Self::default() }
    }

    /// Test environments: recording and all outputs disabled.
    pub fn testing() -> Self {
        Self {
            enabled: false,
            max_events: 500,
            prometheus_enabled: false,
            dashboard_enabled: false,
            ..Self::default()
        }
    }

    /// Everything off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            prometheus_enabled: false,
            dashboard_enabled: false,
            ..Self::default()
        }
    }

    /// Bucket window width as a [`Duration`]
    pub fn bucket_duration(&self) -> Duration {
        Duration::from_millis(self.collection_interval_ms)
    }

    /// Check every bound, returning the first violation.
    ///
    /// # Errors
    /// Returns [`FaultlineError::Config`] when:
    /// - `collection_interval_ms` is below 1000
    /// - `max_events` is below 100 or above 1_000_000
    /// - `prometheus_namespace` is not a valid metric name prefix
    pub fn validate(&self) -> Result<()> {
        if self.collection_interval_ms < MIN_COLLECTION_INTERVAL_MS {
            return Err(FaultlineError::Config(format!(
                "collection_interval_ms must be at least {MIN_COLLECTION_INTERVAL_MS}"
            )));
        }
        if self.max_events < MIN_MAX_EVENTS {
            return Err(FaultlineError::Config(format!(
                "max_events must be at least {MIN_MAX_EVENTS}"
            )));
        }
        if self.max_events > MAX_MAX_EVENTS {
            return Err(FaultlineError::Config(format!(
                "max_events must not exceed {MAX_MAX_EVENTS}"
            )));
        }
        if !is_valid_namespace(&self.prometheus_namespace) {
            return Err(FaultlineError::Config(format!(
                "prometheus_namespace '{}' is not a valid metric name prefix",
                self.prometheus_namespace
            )));
        }
        Ok(())
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Builder for [`MetricsConfig`] with fluent API
#[derive(Debug, Default)]
pub struct MetricsConfigBuilder {
    config: MetricsConfig,
}

impl MetricsConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable recording
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the bucket width in milliseconds
    pub fn collection_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.collection_interval_ms = interval_ms;
        self
    }

    /// Set the soft cap on retained events
    pub fn max_events(mut self, max_events: usize) -> Self {
        self.config.max_events = max_events;
        self
    }

    /// Enable or disable the Prometheus exposition
    pub fn prometheus_enabled(mut self, enabled: bool) -> Self {
        self.config.prometheus_enabled = enabled;
        self
    }

    /// Set the Prometheus metric prefix
    pub fn prometheus_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.prometheus_namespace = namespace.into();
        self
    }

    /// Enable or disable dashboard queries
    pub fn dashboard_enabled(mut self, enabled: bool) -> Self {
        self.config.dashboard_enabled = enabled;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    /// See [`MetricsConfig::validate`].
    pub fn build(self) -> Result<MetricsConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
