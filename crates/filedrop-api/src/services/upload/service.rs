//! Batch upload service
//!
//! Processes a batch sequentially: create the batch, then for every file create its
//! record, store the content and record the outcome, then finalize the batch status.
//! A failing file never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use filedrop_core::models::{FailedUpload, FileRecord, NewFileRecord, UploadStatus};
use filedrop_core::{AppError, ErrorMetadata};
use filedrop_db::UploadRecordStore;
use filedrop_storage::{Storage, StorageError, StoredObject};
use uuid::Uuid;

use super::types::{BatchResult, RawFile};

/// Orchestrates the batch upload workflow
#[derive(Clone)]
pub struct BatchUploadService {
    store: Arc<dyn UploadRecordStore>,
    storage: Arc<dyn Storage>,
    put_timeout: Duration,
}

impl BatchUploadService {
    pub fn new(
        store: Arc<dyn UploadRecordStore>,
        storage: Arc<dyn Storage>,
        put_timeout: Duration,
    ) -> Self {
        Self {
            store,
            storage,
            put_timeout,
        }
    }

    /// Upload every file of one request as a single batch.
    ///
    /// Returns `InvalidInput` without touching the store when `files` is empty.
    /// Per-file failures end up in the result; only batch-level persistence
    /// failures are returned as errors.
    #[tracing::instrument(skip(self, files), fields(file_count = files.len(), operation = "upload_batch"))]
    pub async fn process_batch(&self, files: Vec<RawFile>) -> Result<BatchResult, AppError> {
        if files.is_empty() {
            return Err(AppError::InvalidInput("No files provided".to_string()));
        }

        let total_files = i32::try_from(files.len())
            .map_err(|_| AppError::InvalidInput("Too many files in one batch".to_string()))?;

        let batch = self.store.create_batch(total_files).await?;
        self.store
            .set_batch_status(batch.id, UploadStatus::Uploading)
            .await?;

        tracing::info!(batch_id = %batch.id, total_files, "Upload batch started");

        let mut uploaded_files = Vec::with_capacity(files.len());
        let mut failed_files = Vec::new();

        for file in files {
            match self.process_file(batch.id, file).await {
                Ok(record) => uploaded_files.push(record),
                Err(failed) => failed_files.push(failed),
            }
        }

        let final_status =
            UploadStatus::for_batch_outcome(uploaded_files.len(), failed_files.len());
        // Files are already stored and recorded at this point, so the outcome is
        // still reported to the caller.
        if let Err(e) = self.store.set_batch_status(batch.id, final_status).await {
            tracing::error!(
                batch_id = %batch.id,
                status = %final_status,
                error = %e,
                "Failed to finalize upload batch status"
            );
        }

        tracing::info!(
            batch_id = %batch.id,
            status = %final_status,
            success_count = uploaded_files.len(),
            failed_count = failed_files.len(),
            "Upload batch finished"
        );

        Ok(BatchResult {
            batch_id: batch.id,
            uploaded_files,
            failed_files,
        })
    }

    /// Record, store and finalize one file. Every failure is converted into a
    /// [`FailedUpload`] so the batch can carry on.
    async fn process_file(&self, batch_id: Uuid, file: RawFile) -> Result<FileRecord, FailedUpload> {
        let RawFile {
            name,
            content_type,
            data,
        } = file;

        let record = self
            .store
            .create_file_record(NewFileRecord {
                batch_id,
                original_name: name.clone(),
                size_bytes: i64::try_from(data.len()).unwrap_or(i64::MAX),
                content_type: content_type.clone(),
            })
            .await
            .map_err(|e| {
                tracing::error!(%batch_id, file_name = %name, error = %e, "Failed to create file record");
                FailedUpload {
                    name: name.clone(),
                    error: e.to_string(),
                }
            })?;

        match self.put_with_timeout(data, &name, &content_type).await {
            Ok(stored) => self.finish_stored(record, stored).await,
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(
                    %batch_id,
                    file_id = %record.id,
                    file_name = %name,
                    error = %message,
                    error_code = e.error_code(),
                    "Failed to store file"
                );

                if let Err(mark_err) = self.store.fail_file(record.id, &message).await {
                    tracing::error!(
                        file_id = %record.id,
                        error = %mark_err,
                        "Failed to mark file record as failed"
                    );
                }

                Err(FailedUpload {
                    name,
                    error: message,
                })
            }
        }
    }

    async fn put_with_timeout(
        &self,
        data: bytes::Bytes,
        name: &str,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        tokio::time::timeout(self.put_timeout, self.storage.put(data, name, content_type))
            .await
            .unwrap_or_else(|_elapsed| Err(StorageError::Timeout(self.put_timeout.as_secs())))
            .map_err(AppError::from)
    }

    /// Persist a successful store. When that fails the stored object is removed
    /// again so it does not outlive its record.
    async fn finish_stored(
        &self,
        record: FileRecord,
        stored: StoredObject,
    ) -> Result<FileRecord, FailedUpload> {
        match self
            .store
            .complete_file(record.id, &stored.key, &stored.url)
            .await
        {
            Ok(completed) => {
                tracing::debug!(file_id = %completed.id, storage_key = %stored.key, "File stored");
                Ok(completed)
            }
            Err(e) => {
                tracing::error!(
                    file_id = %record.id,
                    storage_key = %stored.key,
                    error = %e,
                    "Failed to record stored file, removing object"
                );

                if let Err(delete_err) = self.storage.delete(&stored.key).await {
                    tracing::warn!(
                        storage_key = %stored.key,
                        error = %delete_err,
                        "Failed to remove orphaned object"
                    );
                }

                let message = e.to_string();
                if let Err(mark_err) = self.store.fail_file(record.id, &message).await {
                    tracing::warn!(file_id = %record.id, error = %mark_err, "Failed to mark file record as failed");
                }

                Err(FailedUpload {
                    name: record.original_name,
                    error: message,
                })
            }
        }
    }
}
