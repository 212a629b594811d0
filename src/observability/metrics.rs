//! Metrics collection and exposition.
//!
//! # Metrics
//! - `servicebay_requests_total` (counter): requests by method, status
//! - `servicebay_request_duration_seconds` (histogram): latency by method
//! - `servicebay_rate_limited_total` (counter): admission denials by tier
//! - `servicebay_rate_limit_buckets` (gauge): live buckets after a sweep
//! - `servicebay_notifications_total` (counter): mail outcomes
//!
//! Without an installed recorder every call here is a no-op, so tests need
//! no setup.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "servicebay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("servicebay_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(tier: &'static str) {
    counter!("servicebay_rate_limited_total", "tier" => tier).increment(1);
}

pub fn record_bucket_count(count: usize) {
    gauge!("servicebay_rate_limit_buckets").set(count as f64);
}

pub fn record_notification(outcome: &'static str) {
    counter!("servicebay_notifications_total", "outcome" => outcome).increment(1);
}

/// Record every request, including ones the gate rejects.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
