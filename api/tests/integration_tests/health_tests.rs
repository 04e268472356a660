//! Integration tests for the health check endpoint and empty-store
//! behavior.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "glimpse-api");
}

#[tokio::test]
async fn test_empty_store_returns_empty_list() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["metrics_count"], 0);
    assert!(response["metrics"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_on_empty_store_is_not_found() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/metrics/host-1/svc-a/anything").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Metric not found");
}
