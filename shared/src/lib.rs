//! Glimpse Shared Library
//!
//! This crate contains the types, storage, and wire conversions used across
//! the Glimpse latest-value metrics sink.
//!
//! # Modules
//!
//! - [`models`] - Metric identities, payloads, and decoded batches
//! - [`storage`] - The latest-value store trait and in-memory implementation
//! - [`otlp`] - OTLP wire types and conversions into the batch model
//!
//! # Example
//!
//! ```
//! use shared::models::{DataPoint, MetricData, MetricKey, MetricsBatch, ResourceMetrics, ScopeMetrics};
//! use shared::storage::{InMemoryLatestStore, LatestStore};
//!
//! let store = InMemoryLatestStore::new();
//! let batch = MetricsBatch::new(vec![ResourceMetrics::new("svc-a", "host-1").with_scope(
//!     ScopeMetrics::new("demo", vec![MetricData::gauge("cpu_usage", vec![DataPoint::new(75.5)])]),
//! )]);
//!
//! store.merge_batch(batch).unwrap();
//!
//! let stored = store
//!     .get(&MetricKey::new("svc-a", "host-1", "cpu_usage"))
//!     .unwrap()
//!     .expect("entry exists");
//! assert_eq!(stored.data.payload.first_value(), Some(75.5));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod otlp;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
