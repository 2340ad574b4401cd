//! Common utilities for the upload handler

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use filedrop_core::AppError;

use crate::services::RawFile;

/// Multipart field carrying the uploaded files
pub const FILES_FIELD: &str = "files";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Collect every file sent under `field_name`, in submission order.
///
/// Parts without a filename are plain form values and are skipped, as are parts
/// with an empty filename (a file input left empty) and other fields. Returns an empty list when nothing matched; the caller decides whether
/// that is an error.
pub async fn extract_multipart_files(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<Vec<RawFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(|s: &str| s.to_string())
        else {
            continue;
        };
        let content_type = field
            .content_type()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let data = field.bytes().await.map_err(multipart_error)?;

        files.push(RawFile {
            name,
            content_type,
            data,
        });
    }

    Ok(files)
}

/// Oversized bodies surface as multipart read errors carrying 413
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}
