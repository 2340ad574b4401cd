pub mod admin;
pub mod upload;

pub use admin::{BlobCleanup, DeleteFileOutcome, UploadAdminService};
pub use upload::{BatchResult, BatchUploadService, RawFile};
