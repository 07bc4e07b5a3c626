//! Prometheus metrics for post-service.
//!
//! Exposes post operation collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Post operations segmented by operation and outcome
    /// (ok, rejected, not_found, contended, error).
    pub static ref POST_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "post_operations_total",
        "Post operations segmented by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("failed to register post_operations_total");

    /// Optimistic saves that lost to a concurrent writer and were re-run.
    pub static ref POST_SAVE_CONFLICTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "post_save_conflicts_total",
        "Version conflicts hit while saving a post",
        &["operation"]
    )
    .expect("failed to register post_save_conflicts_total");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration segmented by method, route and status",
        &["method", "route", "status"]
    )
    .expect("failed to register http_request_duration_seconds");
}

pub fn record_operation(operation: &str, outcome: &str) {
    POST_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

pub fn record_save_conflict(operation: &str) {
    POST_SAVE_CONFLICTS_TOTAL
        .with_label_values(&[operation])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
