//! Integration tests for the snapshot query endpoints.
//!
//! Tests cover:
//! - The end-to-end ingest/list/lookup scenario
//! - Identity isolation across hosts and services
//! - Not-found bodies echoing the requested key

use axum::http::StatusCode;
use chrono::{DateTime, Utc};

use super::common::{export_request, gauge_body, get, post_json, sum_body, test_app};

#[tokio::test]
async fn test_single_sum_metric_scenario() {
    let (app, _state) = test_app();
    let write_started: DateTime<Utc> = Utc::now();

    let body = export_request(Some("svc-a"), Some("host-1"), "requests_total", sum_body(42));
    let (status, _) = post_json(app.clone(), "/v1/metrics", body).await;
    assert_eq!(status, StatusCode::OK);

    // List reports exactly one identity
    let (status, list) = get(app.clone(), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["metrics_count"], 1);

    // Lookup returns the value and a receipt time no earlier than the write
    let (status, lookup) = get(app.clone(), "/metrics/host-1/svc-a/requests_total").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup["service_host"], "host-1");
    assert_eq!(lookup["service_name"], "svc-a");
    assert_eq!(lookup["metric_name"], "requests_total");
    assert_eq!(lookup["data"], 42.0);

    let timestamp = DateTime::parse_from_rfc3339(lookup["timestamp"].as_str().unwrap()).unwrap();
    assert!(timestamp >= write_started);

    // Lookup of an unknown name reports the requested key back
    let (status, miss) = get(app, "/metrics/host-1/svc-a/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(miss["error"], "Metric not found");
    assert_eq!(miss["key"]["host_name"], "host-1");
    assert_eq!(miss["key"]["service_name"], "svc-a");
    assert_eq!(miss["key"]["metric_name"], "nonexistent");
}

#[tokio::test]
async fn test_identities_are_isolated_per_host_and_service() {
    let (app, _state) = test_app();

    for (service, host, value) in [
        ("svc-a", "host-1", 10.0),
        ("svc-a", "host-2", 20.0),
        ("svc-b", "host-1", 30.0),
    ] {
        let body = export_request(Some(service), Some(host), "cpu_usage", gauge_body(value));
        post_json(app.clone(), "/v1/metrics", body).await;
    }

    let (_, list) = get(app.clone(), "/metrics").await;
    assert_eq!(list["metrics_count"], 3);

    let (status, lookup) = get(app.clone(), "/metrics/host-2/svc-a/cpu_usage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup["data"], 20.0);

    let (status, lookup) = get(app, "/metrics/host-1/svc-b/cpu_usage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup["data"], 30.0);
}

#[tokio::test]
async fn test_lookup_is_exact_match_only() {
    let (app, _state) = test_app();

    let body = export_request(Some("svc-a"), Some("host-1"), "requests_total", sum_body(1));
    post_json(app.clone(), "/v1/metrics", body).await;

    // A prefix of the metric name is not a match
    let (status, _) = get(app.clone(), "/metrics/host-1/svc-a/requests").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Swapped host and service segments are not a match
    let (status, _) = get(app, "/metrics/svc-a/host-1/requests_total").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lookup_renders_first_data_point_only() {
    let (app, _state) = test_app();

    let body = export_request(
        Some("svc-a"),
        Some("host-1"),
        "cpu_usage",
        serde_json::json!({
            "gauge": {
                "dataPoints": [
                    {"asDouble": 11.0, "timeUnixNano": "1"},
                    {"asDouble": 99.0, "timeUnixNano": "2"}
                ]
            }
        }),
    );
    post_json(app.clone(), "/v1/metrics", body).await;

    let (status, lookup) = get(app, "/metrics/host-1/svc-a/cpu_usage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup["data"], 11.0);
}
