//! Metrics definitions for the clinic service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `clinic_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: route templates, unknown paths collapsed to `/other`
//! - `status`: success, error, timeout
//! - `operation`: repository operations named in code
//! - `record`: holder, pet, visit
//! - `kind`: error kinds from `ClinicError::kind`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by the
/// `/metrics` endpoint.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("clinic_http".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP latency buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("clinic_repository".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set repository latency buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `clinic_http_requests_total`, `clinic_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("clinic_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("clinic_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code. Redirects count as success.
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=399 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize a request path into its route template.
///
/// Known routes map to their template (`{holderId}`, `{petId}` for numeric
/// ids); anything else becomes `/other`.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/ready" | "/metrics" | "/holders" | "/holders/find"
        | "/holders/new" => path.to_string(),
        _ => normalize_holder_endpoint(path),
    }
}

fn is_id(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

/// Templates under `/holders/{holderId}`.
fn normalize_holder_endpoint(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    let template = match parts.as_slice() {
        ["", "holders", h] if is_id(h) => "/holders/{holderId}",
        ["", "holders", h, "edit"] if is_id(h) => "/holders/{holderId}/edit",
        ["", "holders", h, "pets", "new"] if is_id(h) => "/holders/{holderId}/pets/new",
        ["", "holders", h, "pets", p, "edit"] if is_id(h) && is_id(p) => {
            "/holders/{holderId}/pets/{petId}/edit"
        }
        ["", "holders", h, "pets", p, "visits", "new"] if is_id(h) && is_id(p) => {
            "/holders/{holderId}/pets/{petId}/visits/new"
        }
        // Unknown paths normalized to "/other" to bound cardinality
        _ => "/other",
    };
    template.to_string()
}

// ============================================================================
// Repository Metrics
// ============================================================================

/// Record a repository operation.
///
/// Metric: `clinic_repository_query_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_repository_query(operation: &'static str, success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };
    histogram!("clinic_repository_query_duration_seconds",
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());
}

// ============================================================================
// Record Metrics
// ============================================================================

/// Count a newly created record.
///
/// Metric: `clinic_records_created_total`
/// Labels: `record`
pub fn record_created(record: &'static str) {
    counter!("clinic_records_created_total", "record" => record).increment(1);
}

/// Count a form submission rejected by validation.
///
/// Metric: `clinic_form_rejections_total`
/// Labels: `form`
pub fn record_form_rejection(form: &'static str) {
    counter!("clinic_form_rejections_total", "form" => form).increment(1);
}

/// Count an error response.
///
/// Metric: `clinic_errors_total`
/// Labels: `kind`
pub fn record_error(kind: &'static str) {
    counter!("clinic_errors_total", "kind" => kind).increment(1);
}
