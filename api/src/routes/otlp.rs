//! OTLP HTTP receiver endpoint.
//!
//! Implements the OpenTelemetry Protocol HTTP endpoint for ingesting
//! metrics. Supports both protobuf (`application/x-protobuf`) and JSON
//! (`application/json`) content types.
//!
//! # Endpoints
//!
//! - `POST /v1/metrics` - Ingest OTLP metrics

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use prost::Message;
use serde::{Deserialize, Serialize};
use shared::otlp::conversions::export_request_to_batch;
use shared::otlp::wire::ExportMetricsServiceRequest;

/// Content type for protobuf requests.
const CONTENT_TYPE_PROTOBUF: &str = "application/x-protobuf";

/// Response for OTLP export requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    /// Present when some metrics were rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_success: Option<PartialSuccess>,
}

/// Partial success information.
#[derive(Debug, Serialize, Deserialize)]
pub struct PartialSuccess {
    /// Number of rejected metrics.
    pub rejected_count: i64,
    /// Error message if any metrics were rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Error response for the OTLP endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct OtlpError {
    /// Error code.
    pub code: u32,
    /// Error message.
    pub message: String,
}

/// Creates the OTLP routes with application state.
pub fn otlp_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/metrics", post(ingest_metrics))
        .with_state(state)
}

/// Determines if the request is protobuf based on the Content-Type header.
fn is_protobuf(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(CONTENT_TYPE_PROTOBUF))
}

/// Handler for OTLP metrics ingestion.
///
/// Accepts `ExportMetricsServiceRequest` in protobuf or JSON format,
/// converts it to a batch, and folds it into the store in one write. The
/// acknowledgment is synchronous: once this handler returns, a reader is
/// guaranteed to observe the written entries.
async fn ingest_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ExportResponse>), (StatusCode, Json<OtlpError>)> {
    let request = if is_protobuf(&headers) {
        ExportMetricsServiceRequest::decode(body).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode protobuf metrics request");
            (
                StatusCode::BAD_REQUEST,
                Json(OtlpError {
                    code: 400,
                    message: format!("Failed to decode protobuf: {e}"),
                }),
            )
        })?
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode JSON metrics request");
            (
                StatusCode::BAD_REQUEST,
                Json(OtlpError {
                    code: 400,
                    message: format!("Failed to decode JSON: {e}"),
                }),
            )
        })?
    };

    let batch = export_request_to_batch(&request);
    tracing::debug!(metrics = batch.metric_count(), "Received metrics batch");

    let outcome = state.store().merge_batch(batch).map_err(|e| {
        tracing::error!(error = %e, "Failed to store metrics batch");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(OtlpError {
                code: 500,
                message: e.to_string(),
            }),
        )
    })?;

    let response = if outcome.skipped > 0 {
        ExportResponse {
            partial_success: Some(PartialSuccess {
                rejected_count: i64::try_from(outcome.skipped).unwrap_or(i64::MAX),
                error_message: Some(format!("{} metrics were rejected", outcome.skipped)),
            }),
        }
    } else {
        ExportResponse {
            partial_success: None,
        }
    };

    Ok((StatusCode::OK, Json(response)))
}
