use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use filedrop_core::models::MessageResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/files/{id}/delete/",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File record ID")
    ),
    responses(
        (status = 200, description = "File record deleted; the stored object is removed best effort", body = MessageResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(file_id = %id, operation = "delete_file"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.uploads.admin_service.delete_file(id).await?;

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}
