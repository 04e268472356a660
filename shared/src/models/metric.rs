//! Metric data model.
//!
//! Defines the identity key, the typed payload, and the stored form of a
//! metric as retained by the latest-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use validator::Validate;

/// Sentinel substituted for a resource attribute that is missing or not a
/// string, so that a [`MetricKey`] is always well-formed.
pub const UNKNOWN_ATTRIBUTE: &str = "unknown";

/// The kind of a metric payload this store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// A point-in-time value that can go up or down (e.g., memory usage).
    Gauge,
    /// A running total, optionally monotonic (e.g., request count).
    Sum,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gauge => write!(f, "gauge"),
            Self::Sum => write!(f, "sum"),
        }
    }
}

/// The unique identity of a stored metric series.
///
/// Two metrics with the same `(service_name, host_name, metric_name)` tuple
/// are the same logical series; a later write replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricKey {
    /// Name of the reporting service (`service.name` resource attribute).
    pub service_name: String,
    /// Name of the reporting host (`host.name` resource attribute).
    pub host_name: String,
    /// Name of the metric itself.
    pub metric_name: String,
}

impl MetricKey {
    /// Creates a new metric key.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        host_name: impl Into<String>,
        metric_name: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            host_name: host_name.into(),
            metric_name: metric_name.into(),
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.host_name, self.service_name, self.metric_name
        )
    }
}

/// A single numeric observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// The observed value. Integer observations are widened to `f64`.
    pub value: f64,

    /// Attributes attached to this point (not part of the identity key).
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// When the observation was taken, if the sender supplied it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl DataPoint {
    /// Creates a data point with no attributes and no observation time.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            attributes: HashMap::new(),
            observed_at: None,
        }
    }

    /// Adds an attribute to the data point.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the observation time.
    #[must_use]
    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}

/// The typed payload of a metric.
///
/// Two known variants plus an explicit fallback for kinds this build does
/// not understand. The store rejects `Unsupported` payloads at merge time,
/// so stored entries always carry a known kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MetricPayload {
    /// A gauge: the latest point-in-time values.
    Gauge {
        /// The observed points.
        data_points: Vec<DataPoint>,
    },
    /// A sum: cumulative values, monotonic when the flag is set.
    Sum {
        /// The observed points.
        data_points: Vec<DataPoint>,
        /// Whether the sum only ever increases.
        is_monotonic: bool,
    },
    /// A kind the sender used but this store does not model.
    Unsupported {
        /// The sender-side name of the kind (e.g., "histogram").
        #[serde(rename = "unsupported_kind")]
        kind: String,
    },
}

impl MetricPayload {
    /// Returns the known kind, or `None` for unsupported payloads.
    #[must_use]
    pub fn kind(&self) -> Option<MetricKind> {
        match self {
            Self::Gauge { .. } => Some(MetricKind::Gauge),
            Self::Sum { .. } => Some(MetricKind::Sum),
            Self::Unsupported { .. } => None,
        }
    }

    /// Returns the data points of a known payload, empty otherwise.
    #[must_use]
    pub fn data_points(&self) -> &[DataPoint] {
        match self {
            Self::Gauge { data_points } | Self::Sum { data_points, .. } => data_points,
            Self::Unsupported { .. } => &[],
        }
    }

    /// Returns the first data point's value.
    ///
    /// Responses only ever render the first point, even when more exist.
    #[must_use]
    pub fn first_value(&self) -> Option<f64> {
        self.data_points().first().map(|dp| dp.value)
    }
}

/// Errors that can occur during metric validation.
#[derive(Debug, Error)]
pub enum MetricValidationError {
    /// The metric name is empty.
    #[error("Metric name cannot be empty")]
    EmptyName,

    /// The payload carries no data points.
    #[error("Metric has no data points")]
    NoDataPoints,

    /// The payload kind is not one this store models.
    #[error("Unsupported metric kind: '{0}'")]
    UnsupportedKind(String),

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// A named, typed metric as carried inside a batch.
///
/// # Example
///
/// ```
/// use shared::models::{DataPoint, MetricData};
///
/// let metric = MetricData::sum("requests_total", vec![DataPoint::new(42.0)], true)
///     .with_unit("1");
///
/// assert!(metric.validate_data().is_ok());
/// assert_eq!(metric.payload.first_value(), Some(42.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MetricData {
    /// The name of the metric (e.g., "`requests_total`").
    #[validate(length(min = 1, message = "Metric name cannot be empty"))]
    pub name: String,

    /// Optional description of the metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional unit of the metric (e.g., "bytes", "seconds").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// The typed payload.
    pub payload: MetricPayload,
}

impl MetricData {
    /// Creates a new metric with the given payload.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: MetricPayload) -> Self {
        Self {
            name: name.into(),
            description: None,
            unit: None,
            payload,
        }
    }

    /// Creates a gauge metric.
    #[must_use]
    pub fn gauge(name: impl Into<String>, data_points: Vec<DataPoint>) -> Self {
        Self::new(name, MetricPayload::Gauge { data_points })
    }

    /// Creates a sum metric.
    #[must_use]
    pub fn sum(name: impl Into<String>, data_points: Vec<DataPoint>, is_monotonic: bool) -> Self {
        Self::new(
            name,
            MetricPayload::Sum {
                data_points,
                is_monotonic,
            },
        )
    }

    /// Sets the description of the metric.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the unit of the metric.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Validates that the metric can be stored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is empty
    /// - The payload kind is unsupported
    /// - The payload has no data points
    pub fn validate_data(&self) -> Result<(), MetricValidationError> {
        if self.name.is_empty() {
            return Err(MetricValidationError::EmptyName);
        }

        if let MetricPayload::Unsupported { kind } = &self.payload {
            return Err(MetricValidationError::UnsupportedKind(kind.clone()));
        }

        if self.payload.data_points().is_empty() {
            return Err(MetricValidationError::NoDataPoints);
        }

        self.validate()?;
        Ok(())
    }
}

/// A metric as retained by the store: the payload plus the time the store
/// accepted it. `received_at` is stamped at merge time, never taken from
/// the sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMetric {
    /// The stored metric payload.
    pub data: MetricData,

    /// When the store accepted this value.
    pub received_at: DateTime<Utc>,
}

impl StoredMetric {
    /// Wraps a metric with the current time as its receipt time.
    #[must_use]
    pub fn received_now(data: MetricData) -> Self {
        Self {
            data,
            received_at: Utc::now(),
        }
    }
}
