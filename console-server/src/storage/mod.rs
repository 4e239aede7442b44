//! Object store for uploaded images
//!
//! The document store and the object store share no transaction: callers
//! upload before committing documents and delete after, and log whatever
//! ends up orphaned.

mod memory;
mod s3;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Bucket credentials are not configured
    #[error("A credential/property is missing")]
    NotConfigured,

    #[error("{0}")]
    Backend(String),
}

/// Blob store addressed by generated keys
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Delete several keys in one call; fails if any key failed
    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError>;

    /// Public URL for a stored key
    fn public_link(&self, key: &str) -> String;
}
