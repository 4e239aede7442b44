//! In-process object store
//!
//! Stands in for the bucket in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ObjectStore, StorageError};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    fail_deletes: Arc<Mutex<bool>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects().contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }

    /// Seed an object directly, bypassing `put_object`
    pub fn insert(&self, key: &str, body: &[u8], content_type: &str) {
        self.objects().insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            },
        );
    }

    /// Make every following delete fail, to exercise upstream errors
    pub fn fail_deletes(&self, fail: bool) {
        *self
            .fail_deletes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = fail;
    }

    fn deletes_failing(&self) -> bool {
        *self
            .fail_deletes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.insert(key, &body, content_type);
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if self.deletes_failing() {
            return Err(StorageError::Backend(format!("delete of {key} refused")));
        }
        self.objects().remove(key);
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        if self.deletes_failing() {
            return Err(StorageError::Backend("batch delete refused".into()));
        }
        let mut objects = self.objects();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    fn public_link(&self, key: &str) -> String {
        format!("memory://images/{key}")
    }
}
