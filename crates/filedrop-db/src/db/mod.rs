pub mod file_record;
pub mod transaction;
pub mod upload_batch;

pub use file_record::FileRecordRepository;
pub use upload_batch::UploadBatchRepository;

use filedrop_core::models::UploadStatus;

/// Text form of the states `target` may be reached from, for `status::text = ANY($n)` guards.
pub(crate) fn source_states(target: UploadStatus) -> Vec<String> {
    UploadStatus::sources_of(target)
        .into_iter()
        .map(|status| status.to_string())
        .collect()
}
