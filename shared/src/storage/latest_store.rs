//! Latest-value metric storage.
//!
//! Provides the `LatestStore` trait for the keyed latest-value container
//! and an `InMemoryLatestStore` implementation backed by a reader/writer
//! lock. Only the most recent value per metric identity is retained; there
//! is no history, no eviction, and no TTL, so the store grows with the
//! cardinality of observed identities for the lifetime of the process.

use crate::models::{MetricKey, MetricsBatch, StoredMetric};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A previous holder of the lock panicked.
    #[error("Failed to acquire lock on metric store")]
    LockPoisoned,
}

/// Counters describing how a batch merge went.
///
/// Malformed leaves are skipped, never fatal: a batch merge cannot fail
/// element-wise, it only degrades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Number of metrics upserted into the store.
    pub merged: usize,
    /// Number of metrics dropped as malformed (unsupported kind, no data
    /// points, empty name).
    pub skipped: usize,
}

/// One entry of a point-in-time snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    /// The identity of the series.
    pub key: MetricKey,
    /// Its most recent stored value.
    pub metric: StoredMetric,
}

/// Trait for latest-value metric storage.
///
/// Implementations must be thread-safe (`Send + Sync`): the ingest path
/// writes concurrently with an unbounded number of query readers.
pub trait LatestStore: Send + Sync {
    /// Folds a decoded batch into the store.
    ///
    /// For every leaf metric the identity is derived from the enclosing
    /// resource's service and host plus the metric's own name, and the
    /// entry for that identity is replaced wholesale. The entire fold runs
    /// under one exclusive lock, so a reader polling after this returns is
    /// guaranteed to observe the written entries.
    ///
    /// # Errors
    ///
    /// Returns an error only if the lock is poisoned; malformed metrics are
    /// skipped and counted, never surfaced as a failure.
    fn merge_batch(&self, batch: MetricsBatch) -> Result<MergeOutcome, StoreError>;

    /// Returns every current entry as of one lock-held instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    fn snapshot(&self) -> Result<Vec<SnapshotEntry>, StoreError>;

    /// Returns the entry for an exact identity match, if any.
    ///
    /// No prefix or partial matching is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    fn get(&self, key: &MetricKey) -> Result<Option<StoredMetric>, StoreError>;

    /// Returns the number of entries in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    fn count(&self) -> Result<usize, StoreError>;
}

/// In-memory latest-value store.
///
/// A single `RwLock` guards the map: merges take the exclusive mode, reads
/// the shared mode. Lock hold times are bounded by the cost of folding one
/// batch or cloning one snapshot; no I/O happens under the lock.
#[derive(Debug, Default)]
pub struct InMemoryLatestStore {
    entries: RwLock<HashMap<MetricKey, StoredMetric>>,
}

impl InMemoryLatestStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new store wrapped in an `Arc`.
    #[must_use]
    pub fn new_shared() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::new())
    }
}

impl LatestStore for InMemoryLatestStore {
    fn merge_batch(&self, batch: MetricsBatch) -> Result<MergeOutcome, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut outcome = MergeOutcome::default();

        for resource in batch.resources {
            for scope in resource.scopes {
                for metric in scope.metrics {
                    if let Err(e) = metric.validate_data() {
                        tracing::warn!(
                            metric = %metric.name,
                            service = %resource.service_name,
                            host = %resource.host_name,
                            error = %e,
                            "Skipping malformed metric"
                        );
                        outcome.skipped += 1;
                        continue;
                    }

                    let key = MetricKey::new(
                        resource.service_name.clone(),
                        resource.host_name.clone(),
                        metric.name.clone(),
                    );

                    entries.insert(key, StoredMetric::received_now(metric));
                    outcome.merged += 1;
                }
            }
        }

        tracing::debug!(
            merged = outcome.merged,
            skipped = outcome.skipped,
            total = entries.len(),
            "Merged metrics batch"
        );

        Ok(outcome)
    }

    fn snapshot(&self) -> Result<Vec<SnapshotEntry>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;

        Ok(entries
            .iter()
            .map(|(key, metric)| SnapshotEntry {
                key: key.clone(),
                metric: metric.clone(),
            })
            .collect())
    }

    fn get(&self, key: &MetricKey) -> Result<Option<StoredMetric>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.len())
    }
}
