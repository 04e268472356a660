//! Metric snapshot query endpoints.
//!
//! # Endpoints
//!
//! - `GET /metrics` - List every stored metric identity
//! - `GET /metrics/{host}/{service}/{name}` - Look up one metric's latest value

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::MetricKey;

/// A lightweight descriptor of one stored metric, as returned by the list
/// endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricDetail {
    /// Metric name.
    pub name: String,
    /// Metric kind ("gauge" or "sum").
    #[serde(rename = "type")]
    pub metric_type: String,
    /// Reporting host.
    pub hostname: String,
    /// Reporting service.
    pub servicename: String,
}

/// Response for the list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsListResponse {
    /// Number of stored metric identities.
    pub metrics_count: usize,
    /// One descriptor per identity; ordering is unspecified.
    pub metrics: Vec<MetricDetail>,
}

/// Response for a successful lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricLookupResponse {
    /// The requested host.
    pub service_host: String,
    /// The requested service.
    pub service_name: String,
    /// The requested metric name.
    pub metric_name: String,
    /// When the store accepted the value.
    pub timestamp: DateTime<Utc>,
    /// The first data point's numeric value.
    pub data: f64,
}

/// The identity echoed back on a lookup miss, so callers can distinguish a
/// wrong key from a server error.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestedKey {
    /// The requested host.
    pub host_name: String,
    /// The requested service.
    pub service_name: String,
    /// The requested metric name.
    pub metric_name: String,
}

/// Error body for the query endpoints.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MetricQueryError {
    /// The requested identity has never been stored.
    NotFound {
        /// Fixed error message.
        error: &'static str,
        /// The identity as requested.
        key: RequestedKey,
    },
    /// The store itself failed.
    Storage {
        /// Fixed error label.
        error: &'static str,
        /// Failure details.
        message: String,
    },
}

fn storage_error(e: &shared::storage::StoreError) -> (StatusCode, Json<MetricQueryError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MetricQueryError::Storage {
            error: "storage_error",
            message: e.to_string(),
        }),
    )
}

/// Creates the metric query routes.
pub fn metrics_routes(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(list_metrics))
        .route("/metrics/{host}/{service}/{name}", get(lookup_metric))
        .with_state(state)
}

/// Lists every stored metric identity with its kind.
async fn list_metrics(
    State(state): State<AppState>,
) -> Result<Json<MetricsListResponse>, (StatusCode, Json<MetricQueryError>)> {
    let snapshot = state.store().snapshot().map_err(|e| storage_error(&e))?;

    let metrics: Vec<MetricDetail> = snapshot
        .iter()
        .map(|entry| MetricDetail {
            name: entry.key.metric_name.clone(),
            metric_type: entry
                .metric
                .data
                .payload
                .kind()
                .map_or_else(String::new, |kind| kind.to_string()),
            hostname: entry.key.host_name.clone(),
            servicename: entry.key.service_name.clone(),
        })
        .collect();

    tracing::debug!(metrics_count = metrics.len(), "Listing stored metrics");

    Ok(Json(MetricsListResponse {
        metrics_count: metrics.len(),
        metrics,
    }))
}

/// Looks up one metric's latest value by exact identity.
async fn lookup_metric(
    State(state): State<AppState>,
    Path((host, service, name)): Path<(String, String, String)>,
) -> Result<Json<MetricLookupResponse>, (StatusCode, Json<MetricQueryError>)> {
    let key = MetricKey::new(service, host, name);

    let not_found = |key: &MetricKey| {
        (
            StatusCode::NOT_FOUND,
            Json(MetricQueryError::NotFound {
                error: "Metric not found",
                key: RequestedKey {
                    host_name: key.host_name.clone(),
                    service_name: key.service_name.clone(),
                    metric_name: key.metric_name.clone(),
                },
            }),
        )
    };

    let stored = state
        .store()
        .get(&key)
        .map_err(|e| storage_error(&e))?
        .ok_or_else(|| {
            tracing::debug!(%key, "Lookup miss");
            not_found(&key)
        })?;

    // Only the first data point is ever rendered.
    let data = stored
        .data
        .payload
        .first_value()
        .ok_or_else(|| not_found(&key))?;

    Ok(Json(MetricLookupResponse {
        service_host: key.host_name,
        service_name: key.service_name,
        metric_name: key.metric_name,
        timestamp: stored.received_at,
        data,
    }))
}
