//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading the metrics configuration from
//! files and handing it to the collector.

use std::io::Write;
use std::path::Path;

use faultline_core::ErrorMetricsCollector;
use faultline_domain::FaultlineError;
use faultline_infra::config;
use tempfile::Builder;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "enabled": true,
        "collection_interval_ms": 30000,
        "max_events": 50000,
        "prometheus_enabled": true,
        "prometheus_namespace": "orders_api",
        "dashboard_enabled": false
    }"#;

    let mut temp_file =
        Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(temp_file.path()).expect("Failed to load JSON config");

    assert!(config.enabled);
    assert_eq!(config.collection_interval_ms, 30_000);
    assert_eq!(config.max_events, 50_000);
    assert!(config.prometheus_enabled);
    assert_eq!(config.prometheus_namespace, "orders_api");
    assert!(!config.dashboard_enabled);
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
enabled = false
collection_interval_ms = 10000
max_events = 1000
prometheus_namespace = "billing"
"#;

    let mut temp_file =
        Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load(Some(temp_file.path())).expect("Failed to load TOML config");

    assert!(!config.enabled);
    assert_eq!(config.collection_interval_ms, 10_000);
    assert_eq!(config.max_events, 1_000);
    assert_eq!(config.prometheus_namespace, "billing");
    // Unset fields keep their defaults
    assert!(config.prometheus_enabled);
    assert!(config.dashboard_enabled);
}

/// A loaded file config is accepted by the collector as-is.
#[test]
fn test_loaded_config_builds_collector() {
    let mut temp_file =
        Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    temp_file.write_all(b"collection_interval_ms = 1000\nmax_events = 100\n").unwrap();

    let config = config::load_from_file(temp_file.path()).unwrap();
    let collector = ErrorMetricsCollector::new(config).unwrap();
    assert_eq!(collector.config().max_events, 100);
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Path::new("/nonexistent/path/faultline.json"));

    match result {
        Err(FaultlineError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let mut temp_file =
        Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(br#"{ "this is": "not valid" "#).unwrap();

    match config::load_from_file(temp_file.path()) {
        Err(FaultlineError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_load_config_rejects_out_of_range_values() {
    let mut temp_file =
        Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(br#"{ "max_events": 2000000 }"#).unwrap();

    assert!(matches!(config::load_from_file(temp_file.path()), Err(FaultlineError::Config(_))));
}
