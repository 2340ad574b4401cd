//! Types used by the batch upload service

use bytes::Bytes;
use filedrop_core::models::{BatchUploadResponse, FailedUpload, FileRecord, FileRecordView};
use uuid::Uuid;

/// One file taken from the request, before anything is persisted
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Name as submitted by the client
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Outcome of a whole batch.
///
/// `uploaded_files` and `failed_files` keep submission order, and together
/// account for every submitted file.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub uploaded_files: Vec<FileRecord>,
    pub failed_files: Vec<FailedUpload>,
}

impl BatchResult {
    pub fn success_count(&self) -> usize {
        self.uploaded_files.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn total_count(&self) -> usize {
        self.success_count() + self.failed_count()
    }
}

impl From<BatchResult> for BatchUploadResponse {
    fn from(result: BatchResult) -> Self {
        let success_count = result.success_count();
        let failed_count = result.failed_count();
        let total_files = result.total_count();

        Self {
            batch_id: result.batch_id,
            uploaded_files: result
                .uploaded_files
                .into_iter()
                .map(FileRecordView::from)
                .collect(),
            failed_count,
            total_files,
            success_count,
            failed_files: result.failed_files,
        }
    }
}
