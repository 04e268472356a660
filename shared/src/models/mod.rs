//! Data models for the Glimpse metrics sink.
//!
//! This module contains the core data structures for metric identities,
//! payloads, and decoded ingestion batches.

pub mod batch;
pub mod metric;

pub use batch::{MetricsBatch, ResourceMetrics, ScopeMetrics};
pub use metric::{
    DataPoint, MetricData, MetricKey, MetricKind, MetricPayload, MetricValidationError,
    StoredMetric, UNKNOWN_ATTRIBUTE,
};
