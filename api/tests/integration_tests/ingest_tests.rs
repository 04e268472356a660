//! Integration tests for OTLP metrics ingestion.
//!
//! Tests cover:
//! - JSON and protobuf ingestion
//! - Last-write-wins semantics per identity
//! - Defensive decoding of missing resource attributes
//! - Partial success reporting for unsupported metric kinds

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use prost::Message;
use serde_json::json;
use shared::otlp::wire;

use super::common::{export_request, get, post_json, sum_body, test_app};

#[tokio::test]
async fn test_ingest_then_list() {
    let (app, _state) = test_app();

    let body = export_request(Some("svc-a"), Some("host-1"), "requests_total", sum_body(42));
    let (status, response) = post_json(app.clone(), "/v1/metrics", body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["partial_success"].is_null());

    let (status, response) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["metrics_count"], 1);
    assert_eq!(response["metrics"][0]["name"], "requests_total");
    assert_eq!(response["metrics"][0]["type"], "sum");
    assert_eq!(response["metrics"][0]["hostname"], "host-1");
    assert_eq!(response["metrics"][0]["servicename"], "svc-a");
}

#[tokio::test]
async fn test_later_write_replaces_earlier_value() {
    let (app, _state) = test_app();

    let first = export_request(Some("svc-a"), Some("host-1"), "requests_total", sum_body(1));
    let second = export_request(Some("svc-a"), Some("host-1"), "requests_total", sum_body(2));

    post_json(app.clone(), "/v1/metrics", first).await;
    post_json(app.clone(), "/v1/metrics", second).await;

    let (_, list) = get(app.clone(), "/metrics").await;
    assert_eq!(list["metrics_count"], 1);

    let (status, lookup) = get(app, "/metrics/host-1/svc-a/requests_total").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup["data"], 2.0);
}

#[tokio::test]
async fn test_same_batch_twice_is_idempotent_except_timestamp() {
    let (app, _state) = test_app();

    let body = export_request(Some("svc-a"), Some("host-1"), "requests_total", sum_body(7));

    post_json(app.clone(), "/v1/metrics", body.clone()).await;
    let (_, first) = get(app.clone(), "/metrics/host-1/svc-a/requests_total").await;

    post_json(app.clone(), "/v1/metrics", body).await;
    let (_, second) = get(app.clone(), "/metrics/host-1/svc-a/requests_total").await;

    let (_, list) = get(app, "/metrics").await;
    assert_eq!(list["metrics_count"], 1);
    assert_eq!(first["data"], second["data"]);

    let first_ts =
        chrono::DateTime::parse_from_rfc3339(first["timestamp"].as_str().unwrap()).unwrap();
    let second_ts =
        chrono::DateTime::parse_from_rfc3339(second["timestamp"].as_str().unwrap()).unwrap();
    assert!(second_ts >= first_ts);
}

#[tokio::test]
async fn test_missing_resource_attributes_key_as_unknown() {
    let (app, _state) = test_app();

    let body = export_request(None, None, "orphan_metric", sum_body(5));
    let (status, _) = post_json(app.clone(), "/v1/metrics", body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = get(app.clone(), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["metrics"][0]["hostname"], "unknown");
    assert_eq!(response["metrics"][0]["servicename"], "unknown");

    let (status, response) = get(app, "/metrics/unknown/unknown/orphan_metric").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"], 5.0);
}

#[tokio::test]
async fn test_ingest_protobuf_body() {
    let (app, _state) = test_app();

    let request = wire::ExportMetricsServiceRequest {
        resource_metrics: vec![wire::ResourceMetrics {
            resource: Some(wire::Resource {
                attributes: vec![
                    wire::KeyValue {
                        key: "service.name".to_string(),
                        value: Some(wire::AnyValue {
                            value: Some(wire::any_value::Value::StringValue("svc-pb".to_string())),
                        }),
                    },
                    wire::KeyValue {
                        key: "host.name".to_string(),
                        value: Some(wire::AnyValue {
                            value: Some(wire::any_value::Value::StringValue("host-pb".to_string())),
                        }),
                    },
                ],
            }),
            scope_metrics: vec![wire::ScopeMetrics {
                scope: None,
                metrics: vec![wire::Metric {
                    name: "memory_usage".to_string(),
                    description: String::new(),
                    unit: "bytes".to_string(),
                    data: Some(wire::metric::Data::Gauge(wire::Gauge {
                        data_points: vec![wire::NumberDataPoint {
                            start_time_unix_nano: 0,
                            time_unix_nano: 0,
                            attributes: vec![],
                            value: Some(wire::number_data_point::Value::AsDouble(1024.0)),
                        }],
                    })),
                }],
            }],
        }],
    };

    let response = tower::ServiceExt::oneshot(
        app.clone(),
        Request::builder()
            .method("POST")
            .uri("/v1/metrics")
            .header(header::CONTENT_TYPE, "application/x-protobuf")
            .body(Body::from(request.encode_to_vec()))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let _ = response.into_body().collect().await.unwrap();

    let (status, lookup) = get(app, "/metrics/host-pb/svc-pb/memory_usage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lookup["data"], 1024.0);
}

#[tokio::test]
async fn test_unsupported_kind_is_skipped_with_partial_success() {
    let (app, _state) = test_app();

    let body = json!({
        "resourceMetrics": [{
            "resource": {"attributes": [
                {"key": "service.name", "value": {"stringValue": "svc-a"}},
                {"key": "host.name", "value": {"stringValue": "host-1"}}
            ]},
            "scopeMetrics": [{
                "metrics": [
                    {
                        "name": "request_duration",
                        "histogram": {"dataPoints": [{"timeUnixNano": "1"}]}
                    },
                    {
                        "name": "cpu_usage",
                        "gauge": {"dataPoints": [{"asDouble": 75.5}]}
                    }
                ]
            }]
        }]
    });

    let (status, response) = post_json(app.clone(), "/v1/metrics", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["partial_success"]["rejected_count"], 1);

    // The unsupported metric never lands in the store
    let (_, list) = get(app.clone(), "/metrics").await;
    assert_eq!(list["metrics_count"], 1);

    let (status, _) = get(app, "/metrics/host-1/svc-a/request_duration").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_batch_is_accepted() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app.clone(), "/v1/metrics", json!({"resourceMetrics": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["partial_success"].is_null());

    let (_, list) = get(app, "/metrics").await;
    assert_eq!(list["metrics_count"], 0);
}

#[tokio::test]
async fn test_undecodable_json_returns_400() {
    let (app, _state) = test_app();

    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri("/v1/metrics")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
