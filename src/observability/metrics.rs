//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rest_visitor_dispatch_total` (counter): dispatches by handler, outcome
//! - `rest_http_requests_total` (counter): requests by method, status
//! - `rest_http_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter only when `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record the outcome of a visitor dispatch.
pub fn record_dispatch(handler: &str, outcome: &'static str) {
    metrics::counter!(
        "rest_visitor_dispatch_total",
        "handler" => handler.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "rest_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("rest_http_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
