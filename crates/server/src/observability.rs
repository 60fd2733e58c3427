use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static CAR_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "vehicles_api_requests_total",
        "Requests handled, by operation",
        &["operation"]
    )
    .expect("register requests_total")
});

pub static LOOKUP_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "vehicles_api_lookup_failures_total",
        "Failed pricing/maps lookups, by service",
        &["service"]
    )
    .expect("register lookup_failures_total")
});

pub fn record(operation: &str) {
    CAR_REQUESTS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

/// `GET /metrics`
pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}
