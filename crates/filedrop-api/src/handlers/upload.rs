use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_files, FILES_FIELD};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::IntoResponse,
    Json,
};
use filedrop_core::models::BatchUploadResponse;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/upload/",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Repeated `files` parts, one per file"),
    responses(
        (status = 200, description = "Batch processed; per-file failures are listed in the body", body = BatchUploadResponse),
        (status = 400, description = "No files provided or malformed multipart", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let files = extract_multipart_files(multipart?, FILES_FIELD).await?;

    let result = state.uploads.batch_service.process_batch(files).await?;

    Ok(Json(BatchUploadResponse::from(result)))
}
