use filedrop_core::{
    models::{UploadBatch, UploadStatus},
    AppError,
};
use sqlx::{PgConnection, PgPool, Postgres};
use uuid::Uuid;

use super::source_states;

const BATCH_COLUMNS: &str = "id, created_at, total_files, completed_files, status";

/// Repository for upload batches
#[derive(Clone)]
pub struct UploadBatchRepository {
    pool: PgPool,
}

impl UploadBatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending batch expecting `total_files` files
    #[tracing::instrument(skip(self), fields(db.table = "upload_batches", db.operation = "insert"))]
    pub async fn create(&self, total_files: i32) -> Result<UploadBatch, AppError> {
        if total_files < 0 {
            return Err(AppError::InvalidInput(
                "total_files cannot be negative".to_string(),
            ));
        }

        let batch = sqlx::query_as::<Postgres, UploadBatch>(&format!(
            r#"
            INSERT INTO upload_batches (id, total_files, completed_files, status)
            VALUES ($1, $2, 0, 'pending')
            RETURNING {BATCH_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(total_files)
        .fetch_one(&self.pool)
        .await?;

        Ok(batch)
    }

    /// Get batch by ID
    #[tracing::instrument(skip(self), fields(db.table = "upload_batches", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<UploadBatch>, AppError> {
        let batch = sqlx::query_as::<Postgres, UploadBatch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM upload_batches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    /// List all batches, newest first
    #[tracing::instrument(skip(self), fields(db.table = "upload_batches", db.operation = "select"))]
    pub async fn list_recent(&self) -> Result<Vec<UploadBatch>, AppError> {
        let batches = sqlx::query_as::<Postgres, UploadBatch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM upload_batches ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Move a batch to `status`, rejecting moves its current state does not allow
    #[tracing::instrument(skip(self), fields(db.table = "upload_batches", db.operation = "update", db.record_id = %id))]
    pub async fn transition_status(
        &self,
        id: Uuid,
        status: UploadStatus,
    ) -> Result<UploadBatch, AppError> {
        let updated = sqlx::query_as::<Postgres, UploadBatch>(&format!(
            r#"
            UPDATE upload_batches
            SET status = $2
            WHERE id = $1 AND status::text = ANY($3)
            RETURNING {BATCH_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(source_states(status))
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(batch) => Ok(batch),
            None => match self.get(id).await? {
                Some(current) => Err(AppError::InvalidStateTransition {
                    entity: "upload batch",
                    from: current.status,
                    to: status,
                }),
                None => Err(AppError::NotFound("Upload session not found".to_string())),
            },
        }
    }

    /// Increment the completed-file counter inside the caller's transaction.
    ///
    /// The `UPDATE` takes the batch row lock, so concurrent completions never lose an
    /// increment. Refuses to move the counter past `total_files`.
    pub async fn increment_completed(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE upload_batches
            SET completed_files = completed_files + 1
            WHERE id = $1 AND completed_files < total_files
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Internal(format!(
                "Completed file counter for batch {} cannot be incremented",
                id
            )));
        }

        Ok(())
    }
}
