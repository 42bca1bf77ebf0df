use std::future::Future;
use std::time::Instant;

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

use crate::errors::ServiceError;

// Prometheus metrics (default registry)
pub static STORE_OPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pharmacy_store_ops_total",
        "Drug operations executed, by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("register store_ops_total")
});

pub static STORE_OP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "pharmacy_store_op_duration_seconds",
        "Drug operation duration in seconds",
        &["operation"],
        vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register store_op_duration")
});

fn outcome<T>(res: &Result<T, ServiceError>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(e) if e.is_not_found() => "not_found",
        Err(_) => "error",
    }
}

/// Run one operation, counting its outcome and timing it.
pub async fn track<T, F>(operation: &'static str, fut: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    let start = Instant::now();
    let res = fut.await;
    STORE_OPS_TOTAL.with_label_values(&[operation, outcome(&res)]).inc();
    STORE_OP_DURATION
        .with_label_values(&[operation])
        .observe(start.elapsed().as_secs_f64());
    res
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
