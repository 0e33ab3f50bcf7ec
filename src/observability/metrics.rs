//! Metrics collection and exposition.
//!
//! # Metrics
//! - `blog_requests_total` (counter): dispatched requests by method, route, status
//! - `blog_request_duration_seconds` (histogram): handler latency by route
//! - `blog_route_not_found_total` (counter): requests no route matched
//! - `blog_url_resolve_failures_total` (counter): reverse resolution failures by route name
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so unit tests and
//!   metrics-disabled deployments pay nothing
//! - Prometheus endpoint is opt-in

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("blog_requests_total", &labels).increment(1);
    histogram!("blog_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_not_found(method: &str) {
    counter!("blog_route_not_found_total", "method" => method.to_string()).increment(1);
}

pub fn record_resolve_failure(route: &str) {
    counter!("blog_url_resolve_failures_total", "route" => route.to_string()).increment(1);
}
