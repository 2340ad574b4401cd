//! Storage setup and initialization

use anyhow::{Context, Result};
use filedrop_core::Config;
use filedrop_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the configured storage backend once for the whole process
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = ?storage.backend_type(),
        key_prefix = config.storage_key_prefix(),
        "Storage backend initialized"
    );

    Ok(storage)
}
