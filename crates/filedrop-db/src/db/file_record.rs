use filedrop_core::{
    models::{FileRecord, NewFileRecord, UploadStatus},
    AppError,
};
use sqlx::{PgConnection, PgPool, Postgres};
use uuid::Uuid;

use super::source_states;

const FILE_COLUMNS: &str = "id, batch_id, original_name, size_bytes, content_type, storage_key, \
     storage_url, status, error_message, created_at, updated_at";

/// Repository for per-file upload records
#[derive(Clone)]
pub struct FileRecordRepository {
    pool: PgPool,
}

impl FileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a record in `uploading` state
    #[tracing::instrument(skip(self, new), fields(db.table = "file_records", db.operation = "insert", batch_id = %new.batch_id))]
    pub async fn create(&self, new: NewFileRecord) -> Result<FileRecord, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            r#"
            INSERT INTO file_records (id, batch_id, original_name, size_bytes, content_type, status)
            VALUES ($1, $2, $3, $4, $5, 'uploading')
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.batch_id)
        .bind(&new.original_name)
        .bind(new.size_bytes)
        .bind(&new.content_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get file record by ID
    #[tracing::instrument(skip(self), fields(db.table = "file_records", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM file_records WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Files of one batch in creation order
    #[tracing::instrument(skip(self), fields(db.table = "file_records", db.operation = "select"))]
    pub async fn list_for_batch(&self, batch_id: Uuid) -> Result<Vec<FileRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM file_records WHERE batch_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Files of several batches in creation order, fetched in one query
    #[tracing::instrument(skip(self, batch_ids), fields(db.table = "file_records", db.operation = "select", batch_count = batch_ids.len()))]
    pub async fn list_for_batches(&self, batch_ids: &[Uuid]) -> Result<Vec<FileRecord>, AppError> {
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM file_records WHERE batch_id = ANY($1) ORDER BY created_at ASC, id ASC"
        ))
        .bind(batch_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Mark a record completed inside the caller's transaction.
    ///
    /// Returns `None` when the record does not exist or its state does not allow completion.
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: Uuid,
        storage_key: &str,
        storage_url: &str,
    ) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            r#"
            UPDATE file_records
            SET status = 'completed', storage_key = $2, storage_url = $3,
                error_message = NULL, updated_at = NOW()
            WHERE id = $1 AND status::text = ANY($4)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(storage_key)
        .bind(storage_url)
        .bind(source_states(UploadStatus::Completed))
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }

    /// Mark a record failed with the given reason
    #[tracing::instrument(skip(self, error_message), fields(db.table = "file_records", db.operation = "update", db.record_id = %id))]
    pub async fn mark_failed(&self, id: Uuid, error_message: &str) -> Result<FileRecord, AppError> {
        let updated = sqlx::query_as::<Postgres, FileRecord>(&format!(
            r#"
            UPDATE file_records
            SET status = 'failed', error_message = $2, updated_at = NOW()
            WHERE id = $1 AND status::text = ANY($3)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(error_message)
        .bind(source_states(UploadStatus::Failed))
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(record) => Ok(record),
            None => Err(self.rejected_transition(id, UploadStatus::Failed).await),
        }
    }

    /// Delete a record. Returns whether a row was removed.
    #[tracing::instrument(skip(self), fields(db.table = "file_records", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Explain why a guarded status update matched no row.
    pub(crate) async fn rejected_transition(&self, id: Uuid, to: UploadStatus) -> AppError {
        match self.get(id).await {
            Ok(Some(current)) => AppError::InvalidStateTransition {
                entity: "file record",
                from: current.status,
                to,
            },
            Ok(None) => AppError::NotFound("File not found".to_string()),
            Err(e) => e,
        }
    }
}
