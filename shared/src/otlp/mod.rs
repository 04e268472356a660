//! OpenTelemetry Protocol (OTLP) support.
//!
//! [`wire`] holds the protobuf/JSON wire types for the metrics subset of
//! OTLP; [`conversions`] turns a decoded export request into the internal
//! batch model the store consumes.

pub mod conversions;
pub mod wire;
