//! Wiring of the record store, storage backend and upload services

use crate::state::AppState;
use filedrop_core::Config;
use filedrop_db::PgUploadRecordStore;
use filedrop_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let store = Arc::new(PgUploadRecordStore::new(pool));
    let put_timeout = Duration::from_secs(config.storage_put_timeout_secs());

    tracing::info!(
        put_timeout_secs = config.storage_put_timeout_secs(),
        "Upload services initialized"
    );

    Arc::new(AppState::new(store, storage, put_timeout))
}
