//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration
//! tests, including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};

/// Creates a test router with a fresh in-memory store.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::with_in_memory_store();
    let router = create_router(state.clone());
    (router, state)
}

/// Helper to make a POST request with JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Builds an OTLP/JSON export request with one resource carrying one metric.
///
/// `kind_body` is the metric's data one-of, e.g. a `"sum"` or `"gauge"`
/// object.
pub fn export_request(service: Option<&str>, host: Option<&str>, name: &str, kind_body: Value) -> Value {
    let mut attributes = Vec::new();
    if let Some(service) = service {
        attributes.push(json!({"key": "service.name", "value": {"stringValue": service}}));
    }
    if let Some(host) = host {
        attributes.push(json!({"key": "host.name", "value": {"stringValue": host}}));
    }

    let mut metric = json!({"name": name});
    for (key, value) in kind_body.as_object().unwrap() {
        metric[key] = value.clone();
    }

    json!({
        "resourceMetrics": [{
            "resource": {"attributes": attributes},
            "scopeMetrics": [{
                "scope": {"name": "integration-meter"},
                "metrics": [metric]
            }]
        }]
    })
}

/// A sum metric body with a single integer data point.
pub fn sum_body(value: i64) -> Value {
    json!({
        "sum": {
            "dataPoints": [{"asInt": value, "timeUnixNano": "1700000000000000000"}],
            "isMonotonic": true
        }
    })
}

/// A gauge metric body with a single double data point.
pub fn gauge_body(value: f64) -> Value {
    json!({
        "gauge": {
            "dataPoints": [{"asDouble": value, "timeUnixNano": "1700000000000000000"}]
        }
    })
}
