//! Mock Storage implementation for testing

use async_trait::async_trait;
use bytes::Bytes;
use filedrop_storage::keys::generate_storage_key;
use filedrop_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock storage implementation that keeps objects in memory.
///
/// Failures are configured per submitted filename before the mock is shared.
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    put_names: Mutex<Vec<String>>,
    failing_puts: HashMap<String, String>,
    slow_puts: HashMap<String, Duration>,
    fail_deletes: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `put` of `filename` fail with `message`
    pub fn fail_put_for(mut self, filename: &str, message: &str) -> Self {
        self.failing_puts
            .insert(filename.to_string(), message.to_string());
        self
    }

    /// Make `put` of `filename` take `delay` before succeeding
    pub fn slow_put_for(mut self, filename: &str, delay: Duration) -> Self {
        self.slow_puts.insert(filename.to_string(), delay);
        self
    }

    pub fn fail_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Filenames passed to `put`, in call order
    pub fn put_names(&self) -> Vec<String> {
        self.put_names.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        self.put_names.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(
        &self,
        data: Bytes,
        filename: &str,
        _content_type: &str,
    ) -> StorageResult<StoredObject> {
        self.put_names.lock().unwrap().push(filename.to_string());

        if let Some(delay) = self.slow_puts.get(filename) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(message) = self.failing_puts.get(filename) {
            return Err(StorageError::UploadFailed(message.clone()));
        }

        let key = generate_storage_key("uploads", filename);
        let url = format!("https://test-bucket.s3.us-east-1.amazonaws.com/{}", key);
        self.objects.lock().unwrap().insert(key.clone(), data);

        Ok(StoredObject { key, url })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        if self.fail_deletes {
            return Err(StorageError::DeleteFailed(
                "storage unavailable".to_string(),
            ));
        }
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
