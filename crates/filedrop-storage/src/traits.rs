//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use filedrop_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Upload timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) | StorageError::DeleteFailed(msg) => {
                AppError::Storage(msg)
            }
            StorageError::Timeout(_) | StorageError::IoError(_) => {
                AppError::Storage(err.to_string())
            }
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Location of an object written by [`Storage::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Internal identifier used to reference (and later delete) the object
    pub key: String,
    /// Public URL of the object. Derived from the key, never checked for existence.
    pub url: String,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the upload
/// services can work with any of them through an `Arc<dyn Storage>`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store the full content of one file under a freshly generated key.
    ///
    /// The content is transferred in a single request together with its content type
    /// and an inline content disposition carrying the original filename. No retries.
    async fn put(&self, data: Bytes, filename: &str, content_type: &str)
        -> StorageResult<StoredObject>;

    /// Delete an object by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedrop_core::ErrorMetadata;

    #[test]
    fn test_upload_failure_becomes_storage_error() {
        let err = AppError::from(StorageError::UploadFailed("connection reset".to_string()));
        assert!(matches!(err, AppError::Storage(ref msg) if msg == "connection reset"));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_timeout_becomes_storage_error() {
        let err = AppError::from(StorageError::Timeout(60));
        assert!(matches!(err, AppError::Storage(ref msg) if msg == "Upload timed out after 60s"));
    }

    #[test]
    fn test_invalid_key_is_client_error() {
        let err = AppError::from(StorageError::InvalidKey("../etc".to_string()));
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(err.http_status_code(), 400);
    }
}
