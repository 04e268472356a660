//! Storage traits and implementations.
//!
//! The `LatestStore` trait defines the interface for the latest-value
//! container; all access from the ingest and query paths goes through it.

pub mod latest_store;

pub use latest_store::{InMemoryLatestStore, LatestStore, MergeOutcome, SnapshotEntry, StoreError};
