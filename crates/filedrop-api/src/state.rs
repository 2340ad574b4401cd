//! Application state shared by all handlers.
//!
//! Split into sub-states so the record store and the storage backend are each built
//! once and handed to the services that need them.

use crate::services::{BatchUploadService, UploadAdminService};
use filedrop_db::UploadRecordStore;
use filedrop_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

/// Persistence handles
#[derive(Clone)]
pub struct DbState {
    pub store: Arc<dyn UploadRecordStore>,
}

/// Storage backend and the services built on it
#[derive(Clone)]
pub struct UploadState {
    pub storage: Arc<dyn Storage>,
    pub batch_service: BatchUploadService,
    pub admin_service: UploadAdminService,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub uploads: UploadState,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UploadRecordStore>,
        storage: Arc<dyn Storage>,
        put_timeout: Duration,
    ) -> Self {
        let batch_service = BatchUploadService::new(store.clone(), storage.clone(), put_timeout);
        let admin_service = UploadAdminService::new(store.clone(), storage.clone());

        Self {
            db: DbState { store },
            uploads: UploadState {
                storage,
                batch_service,
                admin_service,
            },
        }
    }
}
