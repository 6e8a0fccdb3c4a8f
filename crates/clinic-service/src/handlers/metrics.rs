//! Prometheus metrics endpoint handler.
//!
//! This endpoint is unauthenticated so Prometheus can scrape it. Labels carry
//! route templates and record kinds only, never clinic data.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Returns 200 OK with Prometheus text format:
/// ```text
/// # TYPE clinic_http_requests_total counter
/// clinic_http_requests_total{method="GET",endpoint="/holders/{holderId}",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "clinic.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
