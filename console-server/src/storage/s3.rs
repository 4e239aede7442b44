//! S3-backed object store

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectCannedAcl, ObjectIdentifier};

use super::{ObjectStore, StorageError};
use crate::config::S3Config;

/// Images live at the bucket root, publicly readable
#[derive(Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_access_key,
            None,
            None,
            "console-static",
        );
        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: S3Client::from_conf(sdk_config),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "S3 upload failed");
                StorageError::Backend(format!("Image upload failed: {e}"))
            })?;

        tracing::info!(key = %key, "Image uploaded to S3");
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "S3 delete failed");
                StorageError::Backend(format!("Image delete failed: {e}"))
            })?;

        tracing::info!(key = %key, "Image deleted from S3");
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }

        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let output = self
            .client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(count = keys.len(), error = %e, "S3 batch delete failed");
                StorageError::Backend(format!("Image delete failed: {e}"))
            })?;

        let failed = output.errors();
        if !failed.is_empty() {
            for err in failed {
                tracing::error!(
                    key = err.key().unwrap_or_default(),
                    error = err.message().unwrap_or_default(),
                    "S3 object not deleted"
                );
            }
            return Err(StorageError::Backend(format!(
                "{} of {} images could not be deleted",
                failed.len(),
                keys.len()
            )));
        }

        tracing::info!(count = keys.len(), "Images deleted from S3");
        Ok(())
    }

    fn public_link(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}
