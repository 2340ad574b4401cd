//! Database transaction utilities
//!
//! Multi-step writes that must land together (completing a file and bumping its
//! batch counter) go through [`with_transaction`].

use filedrop_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use std::future::Future;
use std::pin::Pin;

/// Execute a closure within a database transaction
///
/// Begins a transaction, runs the closure, and commits if it succeeds or rolls back
/// if it returns an error.
///
/// # Example
///
/// ```ignore
/// use filedrop_db::with_transaction;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), filedrop_core::AppError> {
///     with_transaction(pool, |tx| Box::pin(async move {
///         sqlx::query("UPDATE ...").execute(&mut **tx).await?;
///         sqlx::query("UPDATE ...").execute(&mut **tx).await?;
///         Ok(())
///     })).await
/// }
/// ```
pub async fn with_transaction<F, R>(pool: &PgPool, f: F) -> Result<R, AppError>
where
    F: for<'a> FnOnce(
        &'a mut Transaction<'_, Postgres>,
    ) -> Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'a>>,
{
    let mut tx = pool.begin().await?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
