//! Health check handlers.
//!
//! - `/health`: Liveness check, returns OK if the process is running
//! - `/ready`: Readiness check, pings the repository

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// Liveness handler.
///
/// Does not check any dependencies.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness handler.
///
/// Returns 200 when the repository answers a ping, 503 otherwise. The error
/// message is generic; the actual failure is logged.
#[tracing::instrument(skip_all, name = "clinic.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if let Err(e) = state.holders.ping().await {
        tracing::warn!("Readiness check failed: repository error: {}", e);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                repository: "unhealthy",
                error: Some("Service dependencies unavailable".to_string()),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready",
            repository: "healthy",
            error: None,
        }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "OK");
    }

    #[test]
    fn test_readiness_response_serialization() {
        let ready = ReadinessResponse {
            status: "ready",
            repository: "healthy",
            error: None,
        };

        let json = serde_json::to_string(&ready).unwrap();
        assert!(json.contains("\"status\":\"ready\""));
        assert!(json.contains("\"repository\":\"healthy\""));
        assert!(!json.contains("\"error\""));
    }
}
