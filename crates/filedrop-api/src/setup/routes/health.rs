//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: &'static str,
    pub storage: String,
}

/// Liveness check - process is running.
pub async fn liveness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "alive",
            storage: state.uploads.storage.backend_type().to_string(),
        }),
    )
}

/// Readiness check - the record store answers within the timeout.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match tokio::time::timeout(TIMEOUT, state.db.store.health_check()).await {
        Ok(Ok(())) => "ready".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database readiness check failed");
            format!("not_ready: {}", e)
        }
        Err(_) => {
            tracing::error!("Database readiness check timed out");
            "timeout".to_string()
        }
    };

    let status_code = if database == "ready" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status = if status_code == StatusCode::OK {
        "ready"
    } else {
        "not_ready"
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": status,
            "database": database,
        })),
    )
}
