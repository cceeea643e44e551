//! Metrics collection and exposition.
//!
//! # Metrics
//! - `adapter_invocations_total` (counter): invocations by method, route, status
//! - `adapter_invocation_duration_seconds` (histogram): time spent in `handle`
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op until a recorder is installed
//! - Route label is the matched template, never the raw path (bounded cardinality)
//! - Method label is one of the standard methods or `OTHER`
//! - Prometheus exporter only runs for the local server

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Methods recorded under their own label; anything else is `OTHER`.
const KNOWN_METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "CONNECT", "TRACE",
];

fn method_label(method: &str) -> &'static str {
    KNOWN_METHODS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(method))
        .copied()
        .unwrap_or("OTHER")
}

/// Record one completed invocation.
pub fn record_invocation(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method_label(method).to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("adapter_invocations_total", &labels).increment(1);
    histogram!("adapter_invocation_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
