//! HTTP routes for the clinic service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::repositories::HolderRepository;
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Holder aggregate storage (Postgres or in-memory).
    pub holders: Arc<dyn HolderRepository>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness check
/// - `/ready` - Readiness check (pings the repository)
/// - `/metrics` - Prometheus metrics endpoint
/// - `/holders/...` - holder search, creation, details and edit forms
/// - `/holders/:holder_id/pets/...` - pet creation and edit forms
/// - `/holders/:holder_id/pets/:pet_id/visits/new` - visit form
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - Request timeout from configuration
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_seconds);

    let clinic_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/holders", get(handlers::process_find_form))
        .route("/holders/find", get(handlers::init_find_form))
        .route(
            "/holders/new",
            get(handlers::init_creation_form).post(handlers::process_creation_form),
        )
        .route("/holders/:holder_id", get(handlers::show_holder))
        .route(
            "/holders/:holder_id/edit",
            get(handlers::init_update_form).post(handlers::process_update_form),
        )
        .route(
            "/holders/:holder_id/pets/new",
            get(handlers::init_pet_creation_form).post(handlers::process_pet_creation_form),
        )
        .route(
            "/holders/:holder_id/pets/:pet_id/edit",
            get(handlers::init_pet_update_form).post(handlers::process_pet_update_form),
        )
        .route(
            "/holders/:holder_id/pets/:pet_id/visits/new",
            get(handlers::init_new_visit_form).post(handlers::process_new_visit_form),
        )
        .with_state(state);

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. TraceLayer
    // 3. http_metrics_middleware (outermost, sees framework rejections too)
    clinic_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(http_metrics_middleware))
}
