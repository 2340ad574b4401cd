//! Batch upload service: records, stores and finalizes a batch of files

mod service;
mod types;

pub use service::BatchUploadService;
pub use types::{BatchResult, RawFile};
