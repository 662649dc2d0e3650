//! Metrics collection.
//!
//! # Metrics
//! - `api_requests_total` (counter): calls by endpoint, outcome
//! - `api_request_duration_seconds` (histogram): latency of whole calls
//! - `api_retries_total` (counter): retried attempts by endpoint
//! - `api_auth_failures_total` (counter): rejected credentials
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs an exporter
//! - Without an installed recorder every call is a no-op

use std::time::Instant;

/// Record the end of one logical call.
pub fn record_request(endpoint: &str, outcome: &'static str, start_time: Instant) {
    let duration = start_time.elapsed().as_secs_f64();
    metrics::counter!(
        "api_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "api_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(duration);
}

pub fn record_retry(endpoint: &str) {
    metrics::counter!("api_retries_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_auth_failure() {
    metrics::counter!("api_auth_failures_total").increment(1);
}
