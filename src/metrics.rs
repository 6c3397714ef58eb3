//! Prometheus metrics for request tracking.
//!
//! Recording is always on; the scrape endpoint is only served when a
//! metrics port is configured (see [`install_exporter`]).

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

use crate::error::AppError;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Requests that matched no route.
pub const METRIC_ROUTES_NOT_FOUND: &str = "http_routes_not_found_total";
/// Users created counter metric name.
pub const METRIC_USERS_CREATED: &str = "users_created_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of routed HTTP requests");
    describe_counter!(
        METRIC_ROUTES_NOT_FOUND,
        "Total number of requests that matched no route"
    );
    describe_counter!(METRIC_USERS_CREATED, "Total number of users created");

    debug!("Metrics initialized");
}

/// Serve a Prometheus scrape endpoint on `0.0.0.0:port`.
///
/// Must be called from within a tokio runtime.
pub fn install_exporter(port: u16) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| AppError::Metrics(e.to_string()))?;

    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_http_request(start: Instant, method: &str, endpoint: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment the unmatched route counter.
pub fn inc_routes_not_found() {
    counter!(METRIC_ROUTES_NOT_FOUND).increment(1);
}

/// Increment users created counter.
pub fn inc_users_created() {
    counter!(METRIC_USERS_CREATED).increment(1);
}
