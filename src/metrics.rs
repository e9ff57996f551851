//! Prometheus metrics for request and user-store monitoring.
//!
//! This module provides metrics for:
//! - HTTP request counts and latency
//! - User creation and rejected creation attempts

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::{ApiError, Result};

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Users created counter metric name.
pub const METRIC_USERS_CREATED: &str = "users_created_total";
/// Rejected create-user attempts counter metric name.
pub const METRIC_USER_CREATE_REJECTED: &str = "user_create_rejected_total";

/// Install the Prometheus recorder and register metric descriptions.
///
/// Call once at startup; a second install fails.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_counter!(METRIC_USERS_CREATED, "Total number of users created");
    describe_counter!(
        METRIC_USER_CREATE_REJECTED,
        "Total number of create-user requests rejected by validation"
    );

    debug!("Metrics initialized");
}

/// Record a completed HTTP request.
pub fn record_http_request(start: Instant, method: &str, endpoint: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .record(latency_ms);
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment users created counter.
pub fn inc_users_created() {
    counter!(METRIC_USERS_CREATED).increment(1);
}

/// Increment rejected create-user counter.
pub fn inc_user_create_rejected(reason: &ApiError) {
    let reason = match reason {
        ApiError::InvalidBody => "invalid_body",
        ApiError::MissingFields => "missing_fields",
        _ => "other",
    };
    counter!(METRIC_USER_CREATE_REJECTED, "reason" => reason).increment(1);
}
