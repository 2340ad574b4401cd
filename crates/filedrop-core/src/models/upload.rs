use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Upload status shared by batches and file records.
///
/// Stored as the Postgres enum `upload_status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "upload_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
}

impl UploadStatus {
    pub const ALL: [UploadStatus; 4] = [
        UploadStatus::Pending,
        UploadStatus::Uploading,
        UploadStatus::Completed,
        UploadStatus::Failed,
    ];

    /// States from which `target` may be reached.
    pub fn sources_of(target: UploadStatus) -> Vec<UploadStatus> {
        Self::ALL
            .into_iter()
            .filter(|status| status.can_transition_to(target))
            .collect()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Failed)
    }

    /// Allowed moves: pending -> uploading, and pending|uploading -> completed|failed.
    pub fn can_transition_to(&self, next: UploadStatus) -> bool {
        match (self, next) {
            (UploadStatus::Pending, UploadStatus::Uploading) => true,
            (
                UploadStatus::Pending | UploadStatus::Uploading,
                UploadStatus::Completed | UploadStatus::Failed,
            ) => true,
            _ => false,
        }
    }

    /// Final status of a batch once every file has been attempted.
    ///
    /// Any success makes the batch `completed`; zero successes (including an
    /// empty tally) make it `failed`.
    pub fn for_batch_outcome(success_count: usize, _failed_count: usize) -> UploadStatus {
        if success_count == 0 {
            UploadStatus::Failed
        } else {
            UploadStatus::Completed
        }
    }
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Pending => write!(f, "pending"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Completed => write!(f, "completed"),
            UploadStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for UploadStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UploadStatus::Pending),
            "uploading" => Ok(UploadStatus::Uploading),
            "completed" => Ok(UploadStatus::Completed),
            "failed" => Ok(UploadStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid upload status: {}", s)),
        }
    }
}

/// A group of files submitted in one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UploadBatch {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total_files: i32,
    pub completed_files: i32,
    pub status: UploadStatus,
}

/// Tracking row for one file of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FileRecord {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub original_name: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub storage_key: Option<String>,
    pub storage_url: Option<String>,
    pub status: UploadStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a file record. The record starts in `uploading`.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub batch_id: Uuid,
    pub original_name: String,
    pub size_bytes: i64,
    pub content_type: String,
}

/// A batch together with its files, ordered by creation.
#[derive(Debug, Clone)]
pub struct BatchWithFiles {
    pub batch: UploadBatch,
    pub files: Vec<FileRecord>,
}

/// File record as returned by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRecordView {
    pub id: Uuid,
    pub original_name: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub storage_url: Option<String>,
    pub status: UploadStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileRecordView {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            original_name: record.original_name,
            size_bytes: record.size_bytes,
            content_type: record.content_type,
            storage_url: record.storage_url,
            status: record.status,
            error_message: record.error_message,
            created_at: record.created_at,
        }
    }
}

/// Upload session (batch) as returned by the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total_files: i32,
    pub completed_files: i32,
    pub status: UploadStatus,
    pub files: Vec<FileRecordView>,
}

impl From<BatchWithFiles> for BatchView {
    fn from(value: BatchWithFiles) -> Self {
        let BatchWithFiles { batch, files } = value;
        Self {
            id: batch.id,
            created_at: batch.created_at,
            total_files: batch.total_files,
            completed_files: batch.completed_files,
            status: batch.status,
            files: files.into_iter().map(FileRecordView::from).collect(),
        }
    }
}

/// A file that could not be stored, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FailedUpload {
    pub name: String,
    pub error: String,
}

/// Summary returned by the batch upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchUploadResponse {
    pub batch_id: Uuid,
    /// Successfully stored files, in submission order
    pub uploaded_files: Vec<FileRecordView>,
    pub failed_count: usize,
    pub total_files: usize,
    pub success_count: usize,
    pub failed_files: Vec<FailedUpload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
