//! Decoded metrics batch model.
//!
//! A batch is the hierarchical bundle delivered by an upstream pipeline
//! stage: resources, each with instrumentation scopes, each with named
//! metrics. Resource attributes are already resolved to concrete service
//! and host names by the time a batch reaches the store.

use crate::models::metric::MetricData;
use serde::{Deserialize, Serialize};

/// A group of metrics reported under one instrumentation scope.
///
/// The scope is carried through untouched; it does not participate in the
/// identity key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeMetrics {
    /// Name of the instrumentation scope (library) that produced the metrics.
    #[serde(default)]
    pub scope_name: String,

    /// The metrics reported by this scope.
    pub metrics: Vec<MetricData>,
}

impl ScopeMetrics {
    /// Creates a scope group.
    #[must_use]
    pub fn new(scope_name: impl Into<String>, metrics: Vec<MetricData>) -> Self {
        Self {
            scope_name: scope_name.into(),
            metrics,
        }
    }
}

/// All metrics reported by one resource (a service on a host).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceMetrics {
    /// The reporting service, or `"unknown"` if the sender omitted it.
    pub service_name: String,

    /// The reporting host, or `"unknown"` if the sender omitted it.
    pub host_name: String,

    /// The scope groups under this resource.
    pub scopes: Vec<ScopeMetrics>,
}

impl ResourceMetrics {
    /// Creates a resource group.
    #[must_use]
    pub fn new(service_name: impl Into<String>, host_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            host_name: host_name.into(),
            scopes: Vec::new(),
        }
    }

    /// Adds a scope group to the resource.
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeMetrics) -> Self {
        self.scopes.push(scope);
        self
    }
}

/// A decoded metrics batch ready to be folded into the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsBatch {
    /// The resource groups in this batch.
    pub resources: Vec<ResourceMetrics>,
}

impl MetricsBatch {
    /// Creates a batch from resource groups.
    #[must_use]
    pub fn new(resources: Vec<ResourceMetrics>) -> Self {
        Self { resources }
    }

    /// Returns the number of leaf metrics across all resources and scopes.
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.resources
            .iter()
            .flat_map(|r| &r.scopes)
            .map(|s| s.metrics.len())
            .sum()
    }

    /// Returns true if the batch carries no metrics at all.
    ///
    /// An empty batch is accepted as a no-op by the store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metric_count() == 0
    }
}
