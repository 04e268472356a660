//! Conversions between OTLP wire types and internal Glimpse types.
//!
//! Decoding is defensive throughout: a resource that omits `service.name`
//! or `host.name` resolves to `"unknown"` instead of failing, data points
//! without a value are dropped, and metric kinds beyond gauge and sum are
//! mapped to an unsupported payload that the store skips at merge time.

use crate::models::{
    DataPoint, MetricData, MetricPayload, MetricsBatch, ResourceMetrics, ScopeMetrics,
    UNKNOWN_ATTRIBUTE,
};
use crate::otlp::wire;
use base64::Engine;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::{Duration, UNIX_EPOCH};

/// Converts an OTLP timestamp (nanoseconds since epoch) to a `DateTime<Utc>`.
fn timestamp_to_datetime(nanos: u64) -> DateTime<Utc> {
    let duration = Duration::from_nanos(nanos);
    DateTime::<Utc>::from(UNIX_EPOCH + duration)
}

/// Renders an OTLP `AnyValue` as a plain string.
///
/// Scalars print their natural form, bytes are base64-encoded, and nested
/// arrays/lists fall back to their JSON rendering.
fn any_value_to_string(value: &wire::AnyValue) -> Option<String> {
    use wire::any_value::Value;

    match value.value.as_ref()? {
        Value::StringValue(s) => Some(s.clone()),
        Value::BoolValue(b) => Some(b.to_string()),
        Value::IntValue(i) => Some(i.to_string()),
        Value::DoubleValue(d) => Some(d.to_string()),
        Value::BytesValue(b) => Some(base64::engine::general_purpose::STANDARD.encode(b)),
        Value::ArrayValue(_) | Value::KvlistValue(_) => {
            serde_json::to_string(value).ok()
        }
    }
}

/// Looks up an attribute by key and renders it as a string.
fn attribute_value(attributes: &[wire::KeyValue], key: &str) -> Option<String> {
    attributes
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.as_ref())
        .and_then(any_value_to_string)
}

/// Resolves a resource attribute, substituting `"unknown"` when the
/// resource or the attribute is absent.
fn resource_attribute_or_unknown(resource: Option<&wire::Resource>, key: &str) -> String {
    resource
        .and_then(|r| attribute_value(&r.attributes, key))
        .unwrap_or_else(|| UNKNOWN_ATTRIBUTE.to_string())
}

/// Converts OTLP key-value pairs to a string-only map.
fn key_values_to_string_map(attributes: &[wire::KeyValue]) -> HashMap<String, String> {
    attributes
        .iter()
        .filter_map(|kv| {
            kv.value
                .as_ref()
                .and_then(any_value_to_string)
                .map(|v| (kv.key.clone(), v))
        })
        .collect()
}

/// Converts one OTLP number data point, dropping points without a value.
fn number_point_to_data_point(point: &wire::NumberDataPoint) -> Option<DataPoint> {
    use wire::number_data_point::Value;

    let value = match point.value.as_ref()? {
        Value::AsDouble(d) => *d,
        #[allow(clippy::cast_precision_loss)]
        Value::AsInt(i) => *i as f64,
    };

    let mut data_point = DataPoint::new(value);
    data_point.attributes = key_values_to_string_map(&point.attributes);
    if point.time_unix_nano > 0 {
        data_point.observed_at = Some(timestamp_to_datetime(point.time_unix_nano));
    }

    Some(data_point)
}

/// Converts a list of number data points.
fn number_points(points: &[wire::NumberDataPoint]) -> Vec<DataPoint> {
    points.iter().filter_map(number_point_to_data_point).collect()
}

/// Converts one OTLP metric into the internal form.
///
/// Kinds this store does not model convert to an unsupported payload; the
/// store logs and skips those at merge time rather than aborting the batch.
fn wire_metric_to_metric_data(metric: &wire::Metric) -> MetricData {
    use wire::metric::Data;

    let payload = match &metric.data {
        Some(Data::Gauge(gauge)) => MetricPayload::Gauge {
            data_points: number_points(&gauge.data_points),
        },
        Some(Data::Sum(sum)) => MetricPayload::Sum {
            data_points: number_points(&sum.data_points),
            is_monotonic: sum.is_monotonic,
        },
        Some(other) => MetricPayload::Unsupported {
            kind: other.kind_name().to_string(),
        },
        None => MetricPayload::Unsupported {
            kind: "none".to_string(),
        },
    };

    let mut data = MetricData::new(metric.name.clone(), payload);
    if !metric.description.is_empty() {
        data = data.with_description(metric.description.clone());
    }
    if !metric.unit.is_empty() {
        data = data.with_unit(metric.unit.clone());
    }
    data
}

/// Converts a full OTLP export request into a decoded batch.
///
/// Service and host names are resolved per resource; every enclosed metric
/// inherits them for identity derivation in the store.
#[must_use]
pub fn export_request_to_batch(request: &wire::ExportMetricsServiceRequest) -> MetricsBatch {
    let resources = request
        .resource_metrics
        .iter()
        .map(|rm| {
            let service_name =
                resource_attribute_or_unknown(rm.resource.as_ref(), "service.name");
            let host_name = resource_attribute_or_unknown(rm.resource.as_ref(), "host.name");

            let scopes = rm
                .scope_metrics
                .iter()
                .map(|sm| {
                    let scope_name = sm
                        .scope
                        .as_ref()
                        .map_or_else(String::new, |s| s.name.clone());
                    let metrics = sm.metrics.iter().map(wire_metric_to_metric_data).collect();
                    ScopeMetrics::new(scope_name, metrics)
                })
                .collect();

            ResourceMetrics {
                service_name,
                host_name,
                scopes,
            }
        })
        .collect();

    MetricsBatch::new(resources)
}
