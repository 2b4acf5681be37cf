use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use mockall::automock;

use crate::domain::value_objects::storage::StoredObject;

/// Object storage for project photos. Originals live under `original/`,
/// worker output under `processed/`.
#[async_trait]
#[automock]
pub trait ImageStorageClient {
    /// Never overwrites: an existing object fails with `StorageError::AlreadyExists`.
    async fn upload_original(
        &self,
        file_name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject>;
    async fn download_processed(&self, file_name: &str) -> Result<Bytes>;
    async fn signed_url(&self, object_key: &str, expires_in: Duration) -> Result<String>;
    async fn delete_object(&self, object_key: &str) -> Result<()>;
}
