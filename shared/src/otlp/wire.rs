//! OTLP metrics wire types.
//!
//! Hand-written prost messages covering the metrics subset of the
//! OpenTelemetry protocol (`ExportMetricsServiceRequest` and the types it
//! nests). Field tags match `opentelemetry.proto.metrics.v1`, so payloads
//! produced by standard OTLP exporters decode with [`prost::Message`].
//! Serde derives provide the OTLP/JSON shape (camelCase keys, one-ofs
//! flattened under their kind name, 64-bit integers accepted as either
//! JSON numbers or decimal strings).
//!
//! Only the fields this sink reads are declared; unknown protobuf fields
//! and unknown JSON keys are skipped on decode.

use serde::{Deserialize, Serialize};

/// The body of an OTLP metrics export call.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportMetricsServiceRequest {
    /// The resource groups carried by this export.
    #[prost(message, repeated, tag = "1")]
    pub resource_metrics: Vec<ResourceMetrics>,
}

/// Metrics reported by one resource.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceMetrics {
    /// The resource describing the reporting entity.
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    /// Metrics grouped by instrumentation scope.
    #[prost(message, repeated, tag = "2")]
    pub scope_metrics: Vec<ScopeMetrics>,
}

/// The reporting entity: a bag of attributes such as `service.name`.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    /// Resource attributes.
    #[prost(message, repeated, tag = "1")]
    pub attributes: Vec<KeyValue>,
}

/// Metrics emitted by one instrumentation scope.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScopeMetrics {
    /// The scope (instrumentation library) that produced the metrics.
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<InstrumentationScope>,

    /// The metrics themselves.
    #[prost(message, repeated, tag = "2")]
    pub metrics: Vec<Metric>,
}

/// An instrumentation scope identifier.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstrumentationScope {
    /// Scope name.
    #[prost(string, tag = "1")]
    pub name: String,

    /// Scope version.
    #[prost(string, tag = "2")]
    pub version: String,
}

/// A single named metric with its typed data.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Metric name.
    #[prost(string, tag = "1")]
    #[serde(default)]
    pub name: String,

    /// Human-readable description.
    #[prost(string, tag = "2")]
    #[serde(default)]
    pub description: String,

    /// Unit of measurement.
    #[prost(string, tag = "3")]
    #[serde(default)]
    pub unit: String,

    /// The typed data one-of. Kinds beyond gauge and sum decode but are
    /// treated as unsupported downstream.
    #[prost(oneof = "metric::Data", tags = "5, 7, 9, 10, 11")]
    #[serde(flatten)]
    pub data: Option<metric::Data>,
}

/// Nested types for [`Metric`].
pub mod metric {
    use super::{ExponentialHistogram, Gauge, Histogram, Sum, Summary};
    use serde::{Deserialize, Serialize};

    /// The typed data of a metric.
    #[derive(Clone, PartialEq, ::prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Data {
        /// Gauge data.
        #[prost(message, tag = "5")]
        Gauge(Gauge),
        /// Sum data.
        #[prost(message, tag = "7")]
        Sum(Sum),
        /// Histogram data (decoded, not stored).
        #[prost(message, tag = "9")]
        Histogram(Histogram),
        /// Exponential histogram data (decoded, not stored).
        #[prost(message, tag = "10")]
        ExponentialHistogram(ExponentialHistogram),
        /// Summary data (decoded, not stored).
        #[prost(message, tag = "11")]
        Summary(Summary),
    }

    impl Data {
        /// The OTLP kind name, used in skip diagnostics.
        #[must_use]
        pub fn kind_name(&self) -> &'static str {
            match self {
                Self::Gauge(_) => "gauge",
                Self::Sum(_) => "sum",
                Self::Histogram(_) => "histogram",
                Self::ExponentialHistogram(_) => "exponential_histogram",
                Self::Summary(_) => "summary",
            }
        }
    }
}

/// Gauge metric data.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Gauge {
    /// The observed points.
    #[prost(message, repeated, tag = "1")]
    pub data_points: Vec<NumberDataPoint>,
}

/// Sum metric data.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sum {
    /// The observed points.
    #[prost(message, repeated, tag = "1")]
    pub data_points: Vec<NumberDataPoint>,

    /// OTLP aggregation temporality. Decoded for completeness, unused.
    #[prost(enumeration = "AggregationTemporality", tag = "2")]
    #[serde(skip)]
    pub aggregation_temporality: i32,

    /// Whether the sum is monotonic.
    #[prost(bool, tag = "3")]
    pub is_monotonic: bool,
}

/// Histogram metric data. Decoded so unsupported kinds degrade gracefully
/// instead of failing the whole export; never stored.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Histogram {
    /// The observed buckets.
    #[prost(message, repeated, tag = "1")]
    pub data_points: Vec<HistogramDataPoint>,

    /// OTLP aggregation temporality. Decoded for completeness, unused.
    #[prost(enumeration = "AggregationTemporality", tag = "2")]
    #[serde(skip)]
    pub aggregation_temporality: i32,
}

/// One histogram bucket set.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistogramDataPoint {
    /// When the observation was taken (nanoseconds since epoch).
    #[prost(fixed64, tag = "3")]
    #[serde(with = "flex_u64")]
    pub time_unix_nano: u64,

    /// Total count of observations.
    #[prost(fixed64, tag = "4")]
    #[serde(skip)]
    pub count: u64,

    /// Sum of observations.
    #[prost(double, optional, tag = "5")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,

    /// Point attributes.
    #[prost(message, repeated, tag = "9")]
    pub attributes: Vec<KeyValue>,
}

/// Exponential histogram metric data. Decoded, never stored.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExponentialHistogram {
    /// The observed points.
    #[prost(message, repeated, tag = "1")]
    pub data_points: Vec<ExponentialHistogramDataPoint>,

    /// OTLP aggregation temporality. Decoded for completeness, unused.
    #[prost(enumeration = "AggregationTemporality", tag = "2")]
    #[serde(skip)]
    pub aggregation_temporality: i32,
}

/// One exponential histogram point.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExponentialHistogramDataPoint {
    /// Point attributes.
    #[prost(message, repeated, tag = "1")]
    pub attributes: Vec<KeyValue>,

    /// When the observation was taken (nanoseconds since epoch).
    #[prost(fixed64, tag = "3")]
    #[serde(with = "flex_u64")]
    pub time_unix_nano: u64,
}

/// Summary metric data. Decoded, never stored.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Summary {
    /// The observed points.
    #[prost(message, repeated, tag = "1")]
    pub data_points: Vec<SummaryDataPoint>,
}

/// One summary point.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryDataPoint {
    /// When the observation was taken (nanoseconds since epoch).
    #[prost(fixed64, tag = "3")]
    #[serde(with = "flex_u64")]
    pub time_unix_nano: u64,

    /// Point attributes.
    #[prost(message, repeated, tag = "7")]
    pub attributes: Vec<KeyValue>,
}

/// A single numeric observation.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberDataPoint {
    /// Start of the aggregation window (nanoseconds since epoch).
    #[prost(fixed64, tag = "2")]
    #[serde(default, with = "flex_u64")]
    pub start_time_unix_nano: u64,

    /// When the observation was taken (nanoseconds since epoch).
    #[prost(fixed64, tag = "3")]
    #[serde(default, with = "flex_u64")]
    pub time_unix_nano: u64,

    /// Point attributes.
    #[prost(message, repeated, tag = "7")]
    #[serde(default)]
    pub attributes: Vec<KeyValue>,

    /// The observed value.
    #[prost(oneof = "number_data_point::Value", tags = "4, 6")]
    #[serde(flatten)]
    pub value: Option<number_data_point::Value>,
}

/// Nested types for [`NumberDataPoint`].
pub mod number_data_point {
    use serde::{Deserialize, Serialize};

    /// The observed value as either representation OTLP allows.
    #[derive(Clone, PartialEq, ::prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Value {
        /// Floating point observation.
        #[prost(double, tag = "4")]
        AsDouble(f64),
        /// Integer observation.
        #[prost(sfixed64, tag = "6")]
        #[serde(with = "super::flex_i64")]
        AsInt(i64),
    }
}

/// An attribute key paired with its value.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyValue {
    /// Attribute key.
    #[prost(string, tag = "1")]
    pub key: String,

    /// Attribute value.
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AnyValue>,
}

/// A dynamically typed attribute value.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnyValue {
    /// The value, absent for an empty attribute.
    #[prost(oneof = "any_value::Value", tags = "1, 2, 3, 4, 5, 6, 7")]
    #[serde(flatten)]
    pub value: Option<any_value::Value>,
}

/// Nested types for [`AnyValue`].
pub mod any_value {
    use super::{ArrayValue, KeyValueList};
    use serde::{Deserialize, Serialize};

    /// The possible attribute value types.
    #[derive(Clone, PartialEq, ::prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Value {
        /// A string.
        #[prost(string, tag = "1")]
        StringValue(String),
        /// A boolean.
        #[prost(bool, tag = "2")]
        BoolValue(bool),
        /// An integer.
        #[prost(int64, tag = "3")]
        #[serde(with = "super::flex_i64")]
        IntValue(i64),
        /// A double.
        #[prost(double, tag = "4")]
        DoubleValue(f64),
        /// A homogeneous or heterogeneous list.
        #[prost(message, tag = "5")]
        ArrayValue(ArrayValue),
        /// A nested key-value list.
        #[prost(message, tag = "6")]
        KvlistValue(KeyValueList),
        /// Raw bytes, base64 in the JSON encoding.
        #[prost(bytes = "vec", tag = "7")]
        #[serde(with = "super::base64_bytes")]
        BytesValue(Vec<u8>),
    }
}

/// A list attribute value.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrayValue {
    /// The list elements.
    #[prost(message, repeated, tag = "1")]
    pub values: Vec<AnyValue>,
}

/// A nested key-value list attribute value.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyValueList {
    /// The nested pairs.
    #[prost(message, repeated, tag = "1")]
    pub values: Vec<KeyValue>,
}

/// OTLP aggregation temporality enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AggregationTemporality {
    /// Unspecified temporality.
    Unspecified = 0,
    /// Delta temporality.
    Delta = 1,
    /// Cumulative temporality.
    Cumulative = 2,
}

/// Serde support for 64-bit unsigned fields that OTLP/JSON encodes as
/// either a number or a decimal string.
pub(crate) mod flex_u64 {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct FlexVisitor;

        impl Visitor<'_> for FlexVisitor {
            type Value = u64;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an unsigned 64-bit integer or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
                u64::try_from(v).map_err(|_| E::custom("negative value for unsigned field"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(FlexVisitor)
    }
}

/// Serde support for 64-bit signed fields that OTLP/JSON encodes as either
/// a number or a decimal string.
pub(crate) mod flex_i64 {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        struct FlexVisitor;

        impl Visitor<'_> for FlexVisitor {
            type Value = i64;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a signed 64-bit integer or a decimal string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
                i64::try_from(v).map_err(|_| E::custom("value out of range for signed field"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(FlexVisitor)
    }
}

/// Serde support for bytes fields, base64 in the JSON encoding.
pub(crate) mod base64_bytes {
    use base64::Engine;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        struct Base64Visitor;

        impl Visitor<'_> for Base64Visitor {
            type Value = Vec<u8>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a base64-encoded string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Vec<u8>, E> {
                base64::engine::general_purpose::STANDARD
                    .decode(v)
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_str(Base64Visitor)
    }
}
