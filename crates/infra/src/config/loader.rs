//! Configuration loader
//!
//! Loads the metrics configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `path` is given, load from that file (JSON or TOML by extension)
//! 2. Otherwise read environment variables, with defaults for anything unset
//! 3. The result is always validated before it is returned
//!
//! ## Environment Variables
//! - `FAULTLINE_METRICS_ENABLED`: Whether collection is enabled (true/false)
//! - `FAULTLINE_METRICS_COLLECTION_INTERVAL_MS`: Bucket width in milliseconds
//! - `FAULTLINE_METRICS_MAX_EVENTS`: Retained-event cap (100..=1000000)
//! - `FAULTLINE_METRICS_PROMETHEUS_ENABLED`: Whether exposition is enabled
//! - `FAULTLINE_METRICS_NAMESPACE`: Prometheus metric-name prefix
//! - `FAULTLINE_METRICS_DASHBOARD_ENABLED`: Whether dashboard queries are
//!   enabled

use std::path::Path;

use faultline_domain::{FaultlineError, MetricsConfig, Result};

use crate::errors::InfraError;

const ENV_ENABLED: &str = "FAULTLINE_METRICS_ENABLED";
const ENV_COLLECTION_INTERVAL_MS: &str = "FAULTLINE_METRICS_COLLECTION_INTERVAL_MS";
const ENV_MAX_EVENTS: &str = "FAULTLINE_METRICS_MAX_EVENTS";
const ENV_PROMETHEUS_ENABLED: &str = "FAULTLINE_METRICS_PROMETHEUS_ENABLED";
const ENV_NAMESPACE: &str = "FAULTLINE_METRICS_NAMESPACE";
const ENV_DASHBOARD_ENABLED: &str = "FAULTLINE_METRICS_DASHBOARD_ENABLED";

/// Load configuration from a file when one is given, else from the
/// environment
///
/// # Errors
/// Returns `FaultlineError::Config` if the chosen source cannot be read or
/// parsed, or the resulting configuration is invalid.
pub fn load(path: Option<&Path>) -> Result<MetricsConfig> {
    match path {
        Some(path) => load_from_file(path),
        None => {
            let config = load_from_env()?;
            tracing::info!(
                enabled = config.enabled,
                collection_interval_ms = config.collection_interval_ms,
                max_events = config.max_events,
                "Metrics configuration loaded from environment variables"
            );
            Ok(config)
        }
    }
}

/// Load configuration from environment variables
///
/// Missing variables fall back to [`MetricsConfig::default`] values.
///
/// # Errors
/// Returns `FaultlineError::Config` if a numeric variable does not parse or
/// the resulting configuration fails validation.
pub fn load_from_env() -> Result<MetricsConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from an arbitrary key lookup
///
/// This is the environment loader with the variable source injected, so
/// callers can feed values from any key-value store.
///
/// # Errors
/// Same as [`load_from_env`].
pub fn load_from_lookup<F>(lookup: F) -> Result<MetricsConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = MetricsConfig::default();

    let config = MetricsConfig {
        enabled: lookup_bool(&lookup, ENV_ENABLED, defaults.enabled),
        collection_interval_ms: lookup_parse(
            &lookup,
            ENV_COLLECTION_INTERVAL_MS,
            defaults.collection_interval_ms,
        )?,
        max_events: lookup_parse(&lookup, ENV_MAX_EVENTS, defaults.max_events)?,
        prometheus_enabled: lookup_bool(
            &lookup,
            ENV_PROMETHEUS_ENABLED,
            defaults.prometheus_enabled,
        ),
        prometheus_namespace: lookup(ENV_NAMESPACE).unwrap_or(defaults.prometheus_namespace),
        dashboard_enabled: lookup_bool(&lookup, ENV_DASHBOARD_ENABLED, defaults.dashboard_enabled),
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// Supports both JSON and TOML formats (detected by file extension). Fields
/// missing from the file take their default values.
///
/// # Errors
/// Returns `FaultlineError::Config` if:
/// - File not found or unreadable
/// - File format is invalid or unsupported
/// - The configuration fails validation
pub fn load_from_file(path: &Path) -> Result<MetricsConfig> {
    if !path.exists() {
        return Err(FaultlineError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    tracing::info!(path = %path.display(), "Loading metrics configuration from file");

    let contents = std::fs::read_to_string(path).map_err(InfraError::from)?;
    let config = parse_config(&contents, path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<MetricsConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FaultlineError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(FaultlineError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Parse a number from the lookup, or `default` when unset
fn lookup_parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| FaultlineError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(default),
    }
}

/// Parse a boolean from the lookup
///
/// Accepts `1`, `true`, `yes`, `on` (case-insensitive) as true; any other
/// value is false. Returns `default` when unset.
fn lookup_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
