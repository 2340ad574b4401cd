//! Upload record store abstraction
//!
//! The upload services only need a handful of operations on batches and file
//! records. [`UploadRecordStore`] captures them so services can be exercised against
//! an in-memory implementation without a database.

use async_trait::async_trait;
use filedrop_core::models::{BatchWithFiles, FileRecord, NewFileRecord, UploadBatch, UploadStatus};
use filedrop_core::AppError;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::transaction::with_transaction;
use crate::db::{FileRecordRepository, UploadBatchRepository};

/// Persistence operations used by the batch orchestrator and the admin service
#[async_trait]
pub trait UploadRecordStore: Send + Sync {
    /// Create a `pending` batch expecting `total_files` files
    async fn create_batch(&self, total_files: i32) -> Result<UploadBatch, AppError>;

    /// Move a batch to `status`; rejects transitions its current state does not allow
    async fn set_batch_status(
        &self,
        batch_id: Uuid,
        status: UploadStatus,
    ) -> Result<UploadBatch, AppError>;

    /// Create an `uploading` record for one file of a batch
    async fn create_file_record(&self, new: NewFileRecord) -> Result<FileRecord, AppError>;

    /// Record a successful store and bump the batch counter atomically
    async fn complete_file(
        &self,
        file_id: Uuid,
        storage_key: &str,
        storage_url: &str,
    ) -> Result<FileRecord, AppError>;

    /// Record a failed store with the failure reason
    async fn fail_file(&self, file_id: Uuid, error_message: &str)
        -> Result<FileRecord, AppError>;

    /// Batch with its files in creation order
    async fn get_batch(&self, batch_id: Uuid) -> Result<Option<BatchWithFiles>, AppError>;

    /// All batches with their files, newest batch first
    async fn list_batches(&self) -> Result<Vec<BatchWithFiles>, AppError>;

    async fn get_file(&self, file_id: Uuid) -> Result<Option<FileRecord>, AppError>;

    /// Delete a file record. Returns whether it existed.
    async fn delete_file(&self, file_id: Uuid) -> Result<bool, AppError>;

    /// Check the backing store is reachable
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Postgres-backed [`UploadRecordStore`]
#[derive(Clone)]
pub struct PgUploadRecordStore {
    pool: PgPool,
    batches: UploadBatchRepository,
    files: FileRecordRepository,
}

impl PgUploadRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            batches: UploadBatchRepository::new(pool.clone()),
            files: FileRecordRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl UploadRecordStore for PgUploadRecordStore {
    async fn create_batch(&self, total_files: i32) -> Result<UploadBatch, AppError> {
        self.batches.create(total_files).await
    }

    async fn set_batch_status(
        &self,
        batch_id: Uuid,
        status: UploadStatus,
    ) -> Result<UploadBatch, AppError> {
        self.batches.transition_status(batch_id, status).await
    }

    async fn create_file_record(&self, new: NewFileRecord) -> Result<FileRecord, AppError> {
        self.files.create(new).await
    }

    #[tracing::instrument(skip(self, storage_key, storage_url), fields(db.table = "file_records", db.operation = "update", db.record_id = %file_id))]
    async fn complete_file(
        &self,
        file_id: Uuid,
        storage_key: &str,
        storage_url: &str,
    ) -> Result<FileRecord, AppError> {
        let storage_key = storage_key.to_string();
        let storage_url = storage_url.to_string();

        let completed = with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let record = FileRecordRepository::mark_completed(
                    &mut **tx,
                    file_id,
                    &storage_key,
                    &storage_url,
                )
                .await?;

                if let Some(ref record) = record {
                    UploadBatchRepository::increment_completed(&mut **tx, record.batch_id)
                        .await?;
                }

                Ok::<_, AppError>(record)
            })
        })
        .await?;

        match completed {
            Some(record) => Ok(record),
            None => Err(self
                .files
                .rejected_transition(file_id, UploadStatus::Completed)
                .await),
        }
    }

    async fn fail_file(
        &self,
        file_id: Uuid,
        error_message: &str,
    ) -> Result<FileRecord, AppError> {
        self.files.mark_failed(file_id, error_message).await
    }

    async fn get_batch(&self, batch_id: Uuid) -> Result<Option<BatchWithFiles>, AppError> {
        let Some(batch) = self.batches.get(batch_id).await? else {
            return Ok(None);
        };
        let files = self.files.list_for_batch(batch_id).await?;

        Ok(Some(BatchWithFiles { batch, files }))
    }

    async fn list_batches(&self) -> Result<Vec<BatchWithFiles>, AppError> {
        let batches = self.batches.list_recent().await?;
        let ids: Vec<Uuid> = batches.iter().map(|b| b.id).collect();

        let mut files_by_batch: HashMap<Uuid, Vec<FileRecord>> = HashMap::new();
        for record in self.files.list_for_batches(&ids).await? {
            files_by_batch
                .entry(record.batch_id)
                .or_default()
                .push(record);
        }

        Ok(batches
            .into_iter()
            .map(|batch| {
                let files = files_by_batch.remove(&batch.id).unwrap_or_default();
                BatchWithFiles { batch, files }
            })
            .collect())
    }

    async fn get_file(&self, file_id: Uuid) -> Result<Option<FileRecord>, AppError> {
        self.files.get(file_id).await
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, AppError> {
        self.files.delete(file_id).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
