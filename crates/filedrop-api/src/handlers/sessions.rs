use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use filedrop_core::models::BatchView;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/",
    tag = "sessions",
    params(
        ("id" = Uuid, Path, description = "Upload session (batch) ID")
    ),
    responses(
        (status = 200, description = "Upload session with its files", body = BatchView),
        (status = 404, description = "Upload session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(batch_id = %id, operation = "get_session"))]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let batch = state.uploads.admin_service.get_batch(id).await?;
    Ok(Json(BatchView::from(batch)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/",
    tag = "sessions",
    responses(
        (status = 200, description = "All upload sessions, newest first", body = Vec<BatchView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_sessions"))]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let batches = state.uploads.admin_service.list_batches().await?;
    let views: Vec<BatchView> = batches.into_iter().map(BatchView::from).collect();
    Ok(Json(views))
}
