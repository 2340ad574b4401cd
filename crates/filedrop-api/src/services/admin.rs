//! Read and maintenance operations on stored batches and files

use std::sync::Arc;

use filedrop_core::models::BatchWithFiles;
use filedrop_core::AppError;
use filedrop_db::UploadRecordStore;
use filedrop_storage::Storage;
use uuid::Uuid;

/// What happened to the stored object while deleting a file record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCleanup {
    Deleted,
    /// The record never reached storage
    Skipped,
    /// Storage refused the delete; the record was removed anyway
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct DeleteFileOutcome {
    pub file_id: Uuid,
    pub blob_cleanup: BlobCleanup,
}

#[derive(Clone)]
pub struct UploadAdminService {
    store: Arc<dyn UploadRecordStore>,
    storage: Arc<dyn Storage>,
}

impl UploadAdminService {
    pub fn new(store: Arc<dyn UploadRecordStore>, storage: Arc<dyn Storage>) -> Self {
        Self { store, storage }
    }

    pub async fn get_batch(&self, batch_id: Uuid) -> Result<BatchWithFiles, AppError> {
        self.store
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Upload session not found".to_string()))
    }

    /// All batches, newest first
    pub async fn list_batches(&self) -> Result<Vec<BatchWithFiles>, AppError> {
        self.store.list_batches().await
    }

    /// Delete a file record and, best effort, its stored object.
    ///
    /// A storage failure is logged and reported in the outcome; the record is
    /// deleted regardless.
    #[tracing::instrument(skip(self), fields(operation = "delete_file"))]
    pub async fn delete_file(&self, file_id: Uuid) -> Result<DeleteFileOutcome, AppError> {
        let record = self
            .store
            .get_file(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let blob_cleanup = match record.storage_key.as_deref() {
            None => BlobCleanup::Skipped,
            Some(key) => match self.storage.delete(key).await {
                Ok(()) => BlobCleanup::Deleted,
                Err(e) => {
                    tracing::warn!(
                        %file_id,
                        storage_key = %key,
                        error = %e,
                        "Failed to delete stored object, removing record anyway"
                    );
                    BlobCleanup::Failed(e.to_string())
                }
            },
        };

        if !self.store.delete_file(file_id).await? {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        tracing::info!(%file_id, blob_cleanup = ?blob_cleanup, "File deleted");

        Ok(DeleteFileOutcome {
            file_id,
            blob_cleanup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::upload::{BatchUploadService, RawFile};
    use crate::test_helpers::{MemoryRecordStore, MockStorage};
    use bytes::Bytes;
    use filedrop_core::models::{NewFileRecord, UploadStatus};
    use std::time::Duration;

    async fn upload_one(
        store: &Arc<MemoryRecordStore>,
        storage: &Arc<MockStorage>,
        name: &str,
    ) -> BatchWithFiles {
        let result = BatchUploadService::new(store.clone(), storage.clone(), Duration::from_secs(5))
            .process_batch(vec![RawFile {
                name: name.to_string(),
                content_type: "text/plain".to_string(),
                data: Bytes::from_static(b"hello"),
            }])
            .await
            .unwrap();
        store.get_batch(result.batch_id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_get_unknown_batch_is_not_found() {
        let store = Arc::new(MemoryRecordStore::new());
        let admin = UploadAdminService::new(store, Arc::new(MockStorage::new()));

        let err = admin.get_batch(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Upload session not found"));
    }

    #[tokio::test]
    async fn test_list_batches_newest_first() {
        let store = Arc::new(MemoryRecordStore::new());
        let storage = Arc::new(MockStorage::new());
        let first = upload_one(&store, &storage, "first.txt").await;
        let second = upload_one(&store, &storage, "second.txt").await;

        let admin = UploadAdminService::new(store, storage);
        let listed = admin.list_batches().await.unwrap();

        let ids: Vec<Uuid> = listed.iter().map(|b| b.batch.id).collect();
        assert_eq!(ids, [second.batch.id, first.batch.id]);
    }

    #[tokio::test]
    async fn test_delete_file_removes_object_and_record() {
        let store = Arc::new(MemoryRecordStore::new());
        let storage = Arc::new(MockStorage::new());
        let batch = upload_one(&store, &storage, "a.txt").await;
        let file = &batch.files[0];
        let key = file.storage_key.clone().unwrap();

        let admin = UploadAdminService::new(store.clone(), storage.clone());
        let outcome = admin.delete_file(file.id).await.unwrap();

        assert_eq!(outcome.blob_cleanup, BlobCleanup::Deleted);
        assert!(!storage.has_object(&key));
        assert!(store.get_file(file.id).await.unwrap().is_none());

        // Counters are not rolled back
        let batch = store.get_batch(batch.batch.id).await.unwrap().unwrap();
        assert_eq!(batch.batch.completed_files, 1);
    }

    #[tokio::test]
    async fn test_delete_file_survives_storage_outage() {
        let store = Arc::new(MemoryRecordStore::new());
        let storage = Arc::new(MockStorage::new().fail_deletes());
        let batch = upload_one(&store, &storage, "a.txt").await;
        let file_id = batch.files[0].id;

        let admin = UploadAdminService::new(store.clone(), storage);
        let outcome = admin.delete_file(file_id).await.unwrap();

        assert!(matches!(outcome.blob_cleanup, BlobCleanup::Failed(_)));
        assert!(store.get_file(file_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_file_without_object_skips_storage() {
        let store = Arc::new(MemoryRecordStore::new());
        let batch = store.create_batch(1).await.unwrap();
        let record = store
            .create_file_record(NewFileRecord {
                batch_id: batch.id,
                original_name: "pending.txt".to_string(),
                size_bytes: 1,
                content_type: "text/plain".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(record.status, UploadStatus::Uploading);

        let admin = UploadAdminService::new(store.clone(), Arc::new(MockStorage::new().fail_deletes()));
        let outcome = admin.delete_file(record.id).await.unwrap();

        assert_eq!(outcome.blob_cleanup, BlobCleanup::Skipped);
        assert!(store.get_file(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_file_is_not_found() {
        let admin = UploadAdminService::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MockStorage::new()),
        );

        let err = admin.delete_file(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "File not found"));
    }
}
