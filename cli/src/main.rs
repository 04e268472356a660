//! Glimpse CLI
//!
//! Command-line client for the Glimpse latest-value metrics API.
//!
//! # Usage
//!
//! ```bash
//! glimpse --help
//! glimpse health
//! glimpse list
//! glimpse get host-1 svc-a requests_total
//! glimpse emit --service sample-service --interval-secs 5
//! ```

#![deny(unsafe_code)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use shared::otlp::wire;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Glimpse CLI - client for the latest-value metrics API
#[derive(Parser)]
#[command(name = "glimpse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "GLIMPSE_API_URL",
        default_value = "http://localhost:8890"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,

    /// List every stored metric identity
    List,

    /// Look up one metric's latest value
    Get {
        /// Reporting host
        host: String,
        /// Reporting service
        service: String,
        /// Metric name
        name: String,
    },

    /// Send sample telemetry batches to the ingest endpoint
    Emit {
        /// Value of the `service.name` resource attribute
        #[arg(long, default_value = "sample-service")]
        service: String,

        /// Value of the `host.name` resource attribute
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Seconds to wait between batches
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,

        /// Number of batches to send (0 = until interrupted)
        #[arg(long, default_value_t = 0)]
        count: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let client = reqwest::blocking::Client::new();

    match cli.command {
        Some(Commands::Health) => print_get(&client, &format!("{}/health", cli.api_url)),
        Some(Commands::List) => print_get(&client, &format!("{}/metrics", cli.api_url)),
        Some(Commands::Get {
            host,
            service,
            name,
        }) => print_get(
            &client,
            &format!("{}/metrics/{host}/{service}/{name}", cli.api_url),
        ),
        Some(Commands::Emit {
            service,
            host,
            interval_secs,
            count,
        }) => emit_samples(&client, &cli.api_url, &service, &host, interval_secs, count),
        None => {
            println!("Glimpse CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

/// Fetches a URL and pretty-prints the JSON response with its status.
fn print_get(client: &reqwest::blocking::Client, url: &str) -> anyhow::Result<()> {
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    let body: serde_json::Value = response.json().context("response was not JSON")?;

    println!("{status}");
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Posts sample batches to the ingest endpoint on an interval.
///
/// Each batch carries a monotonically increasing counter and a slowly
/// moving gauge, mirroring what a minimal instrumented service reports.
fn emit_samples(
    client: &reqwest::blocking::Client,
    api_url: &str,
    service: &str,
    host: &str,
    interval_secs: u64,
    count: u64,
) -> anyhow::Result<()> {
    let url = format!("{api_url}/v1/metrics");
    let mut iteration: u64 = 0;

    loop {
        iteration += 1;
        let request = sample_export_request(service, host, iteration);

        let response = client
            .post(&url)
            .json(&request)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        tracing::info!(
            iteration,
            status = %response.status(),
            "Sent sample metrics batch"
        );

        if count > 0 && iteration >= count {
            return Ok(());
        }

        std::thread::sleep(Duration::from_secs(interval_secs));
    }
}

/// Builds one sample OTLP export request.
fn sample_export_request(
    service: &str,
    host: &str,
    iteration: u64,
) -> wire::ExportMetricsServiceRequest {
    let now_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0);

    let string_attr = |key: &str, value: &str| wire::KeyValue {
        key: key.to_string(),
        value: Some(wire::AnyValue {
            value: Some(wire::any_value::Value::StringValue(value.to_string())),
        }),
    };

    #[allow(clippy::cast_precision_loss)]
    let temperature = 20.0 + (iteration % 10) as f64 * 0.5;

    wire::ExportMetricsServiceRequest {
        resource_metrics: vec![wire::ResourceMetrics {
            resource: Some(wire::Resource {
                attributes: vec![
                    string_attr("service.name", service),
                    string_attr("host.name", host),
                ],
            }),
            scope_metrics: vec![wire::ScopeMetrics {
                scope: Some(wire::InstrumentationScope {
                    name: "glimpse-sample".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                }),
                metrics: vec![
                    wire::Metric {
                        name: "sample_requests_total".to_string(),
                        description: "Batches sent by the sample emitter".to_string(),
                        unit: "1".to_string(),
                        data: Some(wire::metric::Data::Sum(wire::Sum {
                            data_points: vec![wire::NumberDataPoint {
                                start_time_unix_nano: 0,
                                time_unix_nano: now_nanos,
                                attributes: vec![],
                                value: Some(wire::number_data_point::Value::AsInt(
                                    i64::try_from(iteration).unwrap_or(i64::MAX),
                                )),
                            }],
                            aggregation_temporality: wire::AggregationTemporality::Cumulative
                                as i32,
                            is_monotonic: true,
                        })),
                    },
                    wire::Metric {
                        name: "sample_temperature".to_string(),
                        description: String::new(),
                        unit: "Cel".to_string(),
                        data: Some(wire::metric::Data::Gauge(wire::Gauge {
                            data_points: vec![wire::NumberDataPoint {
                                start_time_unix_nano: 0,
                                time_unix_nano: now_nanos,
                                attributes: vec![],
                                value: Some(wire::number_data_point::Value::AsDouble(temperature)),
                            }],
                        })),
                    },
                ],
            }],
        }],
    }
}
