use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    error::{ProvideErrorMetadata, SdkError},
    presigning::PresigningConfig,
    primitives::ByteStream,
};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::domain::{
    repositories::storage::ImageStorageClient,
    value_objects::storage::{StorageError, StoredObject, original_key, processed_key},
};

use super::s3::{S3Config, build_s3_client};

#[derive(Debug, Clone)]
pub struct SupabaseStorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

/// Supabase Storage through its S3-compatible API:
/// https://supabase.com/docs/guides/storage/s3/compatibility
pub struct SupabaseStorageClient {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl SupabaseStorageClient {
    pub async fn new(config: SupabaseStorageConfig) -> Result<Self> {
        let client = build_s3_client(&S3Config::new(
            config.endpoint,
            config.region,
            config.access_key,
            config.secret_key,
        ))
        .await
        .context("failed to build Supabase s3 client")?;

        Ok(Self {
            client,
            bucket: config.bucket,
        })
    }
}

#[async_trait]
impl ImageStorageClient for SupabaseStorageClient {
    async fn upload_original(
        &self,
        file_name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject> {
        let object_key = original_key(file_name);
        let size_bytes = bytes.len() as i64;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .if_none_match("*")
            .send()
            .await
            .map_err(|err| map_sdk_error(err, "upload", &self.bucket, &object_key))?;

        debug!(%object_key, size_bytes, "supabase_storage: original uploaded");

        Ok(StoredObject {
            key: object_key,
            size_bytes,
        })
    }

    async fn download_processed(&self, file_name: &str) -> Result<Bytes> {
        let object_key = processed_key(file_name);

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, "download", &self.bucket, &object_key))?;

        let body = output
            .body
            .collect()
            .await
            .with_context(|| format!("failed to read body of {object_key}"))?;

        Ok(body.into_bytes())
    }

    async fn signed_url(&self, object_key: &str, expires_in: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .context("invalid presigned URL expiry")?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key)
            .presigned(presigning)
            .await
            .map_err(|err| map_sdk_error(err, "sign", &self.bucket, object_key))?;

        Ok(request.uri().to_string())
    }

    async fn delete_object(&self, object_key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(object_key)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, "delete", &self.bucket, object_key))?;

        Ok(())
    }
}

fn classify(status: u16, code: &str, detail: String) -> StorageError {
    match (status, code) {
        (_, "NoSuchBucket" | "NoSuchKey" | "NotFound") | (404, _) => StorageError::NotFound(detail),
        (_, "AccessDenied") | (401 | 403, _) => StorageError::PermissionDenied(detail),
        (_, "PreconditionFailed" | "Duplicate") | (409 | 412, _) => {
            StorageError::AlreadyExists(detail)
        }
        _ => StorageError::Other(detail),
    }
}

fn map_sdk_error<E>(err: SdkError<E>, action: &str, bucket: &str, object_key: &str) -> anyhow::Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if let SdkError::ServiceError(service_err) = &err {
        let raw = service_err.raw();
        let status = raw.status().as_u16();
        let code = service_err.err().code().unwrap_or("unknown").to_string();
        let message = service_err.err().message().unwrap_or_default();
        let body = raw
            .body()
            .bytes()
            .map(|b| String::from_utf8_lossy(b).trim().to_owned())
            .filter(|b| !b.is_empty())
            .unwrap_or_default();

        let mut detail = format!("{action} failed (status {status}, code {code})");

        if !message.is_empty() {
            detail.push_str(&format!(": {}", message));
        }

        detail.push_str(&format!(" [bucket={}, key={}]", bucket, object_key));

        if !body.is_empty() {
            // Keep a short preview of the response body for debugging.
            let preview = body.chars().take(512).collect::<String>();
            detail.push_str(&format!("; body={}", preview));
        }

        warn!(%status, %code, %object_key, "supabase_storage: {action} rejected");
        return anyhow::Error::new(classify(status, &code, detail));
    }

    anyhow::Error::new(err).context(format!("failed to {action} object in Supabase Storage"))
}
