//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mcp_requests_total` (counter): inbound requests by intent, status
//! - `mcp_request_duration_seconds` (histogram): inbound latency by intent
//! - `mcp_downstream_calls_total` (counter): downstream calls by method, outcome
//! - `mcp_downstream_duration_seconds` (histogram): downstream latency by method

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Failure is logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound `/mcp` request.
pub fn record_request(intent: &str, status: u16, start: Instant) {
    counter!(
        "mcp_requests_total",
        "intent" => intent.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("mcp_request_duration_seconds", "intent" => intent.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one downstream call.
pub fn record_downstream_call(method: &str, outcome: &str, start: Instant) {
    counter!(
        "mcp_downstream_calls_total",
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!("mcp_downstream_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
