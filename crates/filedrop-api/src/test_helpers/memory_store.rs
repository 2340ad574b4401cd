//! In-memory [`UploadRecordStore`] with the same transition rules as Postgres

use async_trait::async_trait;
use chrono::Utc;
use filedrop_core::models::{BatchWithFiles, FileRecord, NewFileRecord, UploadBatch, UploadStatus};
use filedrop_core::AppError;
use filedrop_db::UploadRecordStore;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    // Insertion order stands in for creation time
    batches: Vec<UploadBatch>,
    files: Vec<FileRecord>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
    failing_record_names: HashSet<String>,
    fail_completion: bool,
    fail_batch_finalization: bool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_file_record` fail for files named `name`
    pub fn fail_record_creation_for(mut self, name: &str) -> Self {
        self.failing_record_names.insert(name.to_string());
        self
    }

    /// Make every `complete_file` fail as if the database went away
    pub fn fail_completion(mut self) -> Self {
        self.fail_completion = true;
        self
    }

    /// Make `set_batch_status` fail when moving a batch to a terminal status
    pub fn fail_batch_finalization(mut self) -> Self {
        self.fail_batch_finalization = true;
        self
    }
}

fn rejected(entity: &'static str, from: UploadStatus, to: UploadStatus) -> AppError {
    AppError::InvalidStateTransition { entity, from, to }
}

#[async_trait]
impl UploadRecordStore for MemoryRecordStore {
    async fn create_batch(&self, total_files: i32) -> Result<UploadBatch, AppError> {
        let batch = UploadBatch {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            total_files,
            completed_files: 0,
            status: UploadStatus::Pending,
        };
        self.tables.lock().unwrap().batches.push(batch.clone());
        Ok(batch)
    }

    async fn set_batch_status(
        &self,
        batch_id: Uuid,
        status: UploadStatus,
    ) -> Result<UploadBatch, AppError> {
        if self.fail_batch_finalization && status.is_terminal() {
            return Err(AppError::Internal("simulated connection loss".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        let batch = tables
            .batches
            .iter_mut()
            .find(|b| b.id == batch_id)
            .ok_or_else(|| AppError::NotFound("Upload session not found".to_string()))?;

        if !batch.status.can_transition_to(status) {
            return Err(rejected("upload batch", batch.status, status));
        }
        batch.status = status;
        Ok(batch.clone())
    }

    async fn create_file_record(&self, new: NewFileRecord) -> Result<FileRecord, AppError> {
        if self.failing_record_names.contains(&new.original_name) {
            return Err(AppError::Internal("simulated insert failure".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        if !tables.batches.iter().any(|b| b.id == new.batch_id) {
            return Err(AppError::NotFound("Upload session not found".to_string()));
        }

        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4(),
            batch_id: new.batch_id,
            original_name: new.original_name,
            size_bytes: new.size_bytes,
            content_type: new.content_type,
            storage_key: None,
            storage_url: None,
            status: UploadStatus::Uploading,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        tables.files.push(record.clone());
        Ok(record)
    }

    async fn complete_file(
        &self,
        file_id: Uuid,
        storage_key: &str,
        storage_url: &str,
    ) -> Result<FileRecord, AppError> {
        if self.fail_completion {
            return Err(AppError::Internal("simulated commit failure".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        let Tables { batches, files } = &mut *tables;

        let record = files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
        if !record.status.can_transition_to(UploadStatus::Completed) {
            return Err(rejected("file record", record.status, UploadStatus::Completed));
        }

        let batch = batches
            .iter_mut()
            .find(|b| b.id == record.batch_id)
            .ok_or_else(|| AppError::NotFound("Upload session not found".to_string()))?;
        if batch.completed_files >= batch.total_files {
            return Err(AppError::Internal(format!(
                "Batch {} already has all files completed",
                batch.id
            )));
        }

        batch.completed_files += 1;
        record.status = UploadStatus::Completed;
        record.storage_key = Some(storage_key.to_string());
        record.storage_url = Some(storage_url.to_string());
        record.error_message = None;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn fail_file(
        &self,
        file_id: Uuid,
        error_message: &str,
    ) -> Result<FileRecord, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let record = tables
            .files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
        if !record.status.can_transition_to(UploadStatus::Failed) {
            return Err(rejected("file record", record.status, UploadStatus::Failed));
        }

        record.status = UploadStatus::Failed;
        record.error_message = Some(error_message.to_string());
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn get_batch(&self, batch_id: Uuid) -> Result<Option<BatchWithFiles>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .batches
            .iter()
            .find(|b| b.id == batch_id)
            .map(|batch| BatchWithFiles {
                batch: batch.clone(),
                files: files_of(&tables.files, batch_id),
            }))
    }

    async fn list_batches(&self) -> Result<Vec<BatchWithFiles>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .batches
            .iter()
            .rev()
            .map(|batch| BatchWithFiles {
                batch: batch.clone(),
                files: files_of(&tables.files, batch.id),
            })
            .collect())
    }

    async fn get_file(&self, file_id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.files.iter().find(|f| f.id == file_id).cloned())
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.files.len();
        tables.files.retain(|f| f.id != file_id);
        Ok(tables.files.len() < before)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn files_of(files: &[FileRecord], batch_id: Uuid) -> Vec<FileRecord> {
    files
        .iter()
        .filter(|f| f.batch_id == batch_id)
        .cloned()
        .collect()
}
