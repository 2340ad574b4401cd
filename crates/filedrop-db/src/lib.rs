//! Filedrop Database Layer
//!
//! Postgres repositories for upload batches and file records, plus the
//! [`UploadRecordStore`] abstraction the upload services are written against.

// Module declarations
pub mod db;
pub mod record_store;

// Re-exports: Repositories
pub use db::{FileRecordRepository, UploadBatchRepository};

// Re-exports: Transaction utilities
pub use db::transaction::with_transaction;

// Re-exports: Store abstraction
pub use record_store::{PgUploadRecordStore, UploadRecordStore};
