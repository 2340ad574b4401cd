//! In-memory doubles for the record store and the storage backend

mod memory_store;
mod mock_storage;

pub use memory_store::MemoryRecordStore;
pub use mock_storage::MockStorage;
