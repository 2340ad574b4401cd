//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use filedrop_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filedrop API",
        version = "0.1.0",
        description = "Batch file upload service. Files of one request are stored in object storage as a single upload session, with per-file outcome tracking."
    ),
    paths(
        handlers::upload::upload_files,
        handlers::sessions::get_session,
        handlers::sessions::list_sessions,
        handlers::files::delete_file,
    ),
    components(
        schemas(
            models::UploadStatus,
            models::FileRecordView,
            models::BatchView,
            models::FailedUpload,
            models::BatchUploadResponse,
            models::MessageResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Batch uploads"),
        (name = "sessions", description = "Upload sessions (batches) and their files"),
        (name = "files", description = "File record maintenance")
    )
)]
pub struct ApiDoc;
