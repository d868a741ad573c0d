//! Integration tests for the collector adapters
//!
//! Wires one collector into the reporter, the Prometheus exporter and the
//! dashboard service the way an application would at startup.

use std::sync::Arc;
use std::thread;

use faultline_core::ErrorMetricsCollector;
use faultline_domain::{ErrorRecord, MetricsConfig};
use faultline_infra::{DashboardService, ErrorReporter, PrometheusExporter};
use serde_json::json;

struct Pipeline {
    collector: Arc<ErrorMetricsCollector>,
    reporter: ErrorReporter,
    exporter: PrometheusExporter,
    dashboard: DashboardService,
}

fn pipeline(config: MetricsConfig) -> Pipeline {
    let collector = Arc::new(ErrorMetricsCollector::new(config.clone()).unwrap());
    Pipeline {
        reporter: ErrorReporter::from_config(collector.clone(), &config),
        exporter: PrometheusExporter::from_config(collector.clone(), &config),
        dashboard: DashboardService::new(collector.clone()),
        collector,
    }
}

/// Validates that reported errors show up in every read view.
///
/// Assertions:
/// - The dashboard summary and per-code counts agree with what was
///   reported.
/// - The exposition carries the same totals.
/// - The most recent event carries its request context.
#[test]
fn reported_errors_flow_to_every_view() {
    let p = pipeline(MetricsConfig::default());

    for _ in 0..5 {
        p.reporter.report(
            ErrorRecord::new(404, "NotFound", 404, "Resource not found")
                .with_path("/api/users/123")
                .with_method("GET"),
        );
    }
    for _ in 0..3 {
        p.reporter.report(
            ErrorRecord::new(1001, "ValidationFailed", 422, "Invalid payload")
                .with_detail(json!({ "field": "email" })),
        );
    }

    let summary = p.dashboard.summary();
    assert_eq!(summary.total_errors, 8);
    assert_eq!(p.dashboard.by_code(404).count, 5);

    let top = p.dashboard.top_errors(10).unwrap();
    assert_eq!(top[0].error_code, 404);
    assert_eq!(top[1].error_code, 1001);

    let recent = p.dashboard.recent(1).unwrap();
    assert_eq!(recent.events[0].detail, Some(json!({ "field": "email" })));

    let text = p.exporter.generate_metrics().unwrap();
    assert!(text.contains("faultline_errors_total 8"));
    assert!(text.contains("faultline_errors_by_code{error_code=\"1001\"} 3"));
    assert!(text.contains("faultline_errors_by_status{status_code=\"422\"} 3"));
}

/// The disabled preset turns off reporting and exposition.
#[test]
fn disabled_preset_records_nothing() {
    let p = pipeline(MetricsConfig::disabled());

    assert_eq!(p.reporter.report(ErrorRecord::new(500, "Boom", 500, "boom")), None);
    assert_eq!(p.collector.total_events(), 0);
    assert_eq!(p.exporter.generate_metrics().unwrap(), "");
}

#[test]
fn concurrent_reporters_share_one_collector() {
    let p = pipeline(MetricsConfig::production());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let reporter = p.reporter.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    reporter.report(ErrorRecord::new(503, "Unavailable", 503, "down"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(p.dashboard.summary().total_errors, 1000);
    assert!(p.exporter.generate_metrics().unwrap().contains("faultline_errors_total 1000"));
}

#[test]
fn snapshot_serializes_for_transport() {
    let p = pipeline(MetricsConfig::development());
    p.reporter.report(ErrorRecord::new(401, "Unauthorized", 401, "no token"));

    let json = p.collector.get_snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_errors"], 1);
    assert_eq!(value["recent_events"][0]["error_name"], "Unauthorized");
}
