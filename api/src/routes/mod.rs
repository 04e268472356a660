//! API route definitions.
//!
//! This module organizes all HTTP routes for the Glimpse API server: the
//! OTLP ingest endpoint, the snapshot query endpoints, and the health
//! check.

mod health;
mod metrics;
mod otlp;

pub use health::health_routes;
pub use metrics::metrics_routes;
pub use otlp::otlp_routes;
