//! S3-based object storage operations
mod error;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::get_object::GetObjectError, presigning::PresigningConfig,
    primitives::ByteStream, Client as S3Client,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

pub use error::{StorageError, StorageResult};

/// Default expiry for presigned URLs, in seconds (1 hour)
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 3600;

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL
    pub url: String,
    /// ISO-8601 UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Object payload fetched from the store
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Raw object bytes
    pub body: Bytes,
    /// Declared content type, when the store has one
    pub content_type: Option<String>,
}

/// Summary of a stored object, as returned by list operations
#[derive(Debug, Clone, Serialize)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,
    /// Object size in bytes
    pub size: i64,
    /// Last-modified timestamp
    pub last_modified: Option<DateTime<Utc>>,
}

/// Object-store operations used by the media API and the resize worker
///
/// The resize worker depends on this trait rather than the S3 client so the
/// derivative generation sequence can be exercised against an in-memory store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches an object's bytes and declared content type
    async fn get_object(&self, key: &str) -> StorageResult<StoredObject>;

    /// Writes an object under the given key
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<()>;

    /// Deletes the object under the given key
    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Lists objects under a key prefix
    async fn list_objects(&self, prefix: &str, max_keys: i32) -> StorageResult<Vec<ObjectSummary>>;
}

/// Media store client for S3 operations
pub struct S3MediaStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    presigned_url_expiry_secs: u64,
}

impl S3MediaStore {
    /// Creates a new media store client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for media storage
    /// * `presigned_url_expiry_secs` - Expiry time for presigned URLs in seconds
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            presigned_url_expiry_secs,
        }
    }

    fn presigning_config(&self) -> StorageResult<PresigningConfig> {
        PresigningConfig::expires_in(Duration::from_secs(self.presigned_url_expiry_secs)).map_err(
            |e| StorageError::ConfigError(format!("Failed to create presigning config: {e}")),
        )
    }

    /// Generates a presigned URL for PUT operations
    ///
    /// # Errors
    ///
    /// Returns `StorageError::S3Error` if presigned URL generation fails
    /// Returns `StorageError::ConfigError` if presigning config creation fails
    pub async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> StorageResult<PresignedUrl> {
        debug!("Generating presigned PUT URL for key: {key}");

        let presigned = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .presigned(self.presigning_config()?)
            .await
            .map_err(|e| StorageError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        let expires_at: DateTime<Utc> =
            Utc::now() + Duration::from_secs(self.presigned_url_expiry_secs);

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            expires_at,
        })
    }

    /// Generates a presigned URL for GET operations
    ///
    /// # Errors
    ///
    /// Returns `StorageError::S3Error` if presigned URL generation fails
    /// Returns `StorageError::ConfigError` if presigning config creation fails
    pub async fn presigned_get_url(&self, key: &str) -> StorageResult<PresignedUrl> {
        debug!("Generating presigned GET URL for key: {key}");

        let presigned = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(self.presigning_config()?)
            .await
            .map_err(|e| StorageError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        let expires_at: DateTime<Utc> =
            Utc::now() + Duration::from_secs(self.presigned_url_expiry_secs);

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            expires_at,
        })
    }
}

#[async_trait]
impl ObjectStore for S3MediaStore {
    async fn get_object(&self, key: &str) -> StorageResult<StoredObject> {
        debug!("Fetching object: {key}");

        let result = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) =>
            {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(SdkError::ServiceError(service_err))
                if service_err.raw().status().as_u16() >= 500 =>
            {
                return Err(StorageError::UpstreamError(format!("{service_err:?}")));
            }
            Err(e) => return Err(StorageError::S3Error(e.to_string())),
        };

        let content_type = output.content_type().map(ToString::to_string);
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3Error(format!("Failed to read object body: {e}")))?
            .into_bytes();

        Ok(StoredObject { body, content_type })
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<()> {
        debug!("Writing object: {key} ({} bytes)", body.len());

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type.map(ToString::to_string))
            .send()
            .await?;

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        debug!("Deleting object: {key}");

        self.s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        Ok(())
    }

    async fn list_objects(&self, prefix: &str, max_keys: i32) -> StorageResult<Vec<ObjectSummary>> {
        debug!("Listing objects under prefix: {prefix}");

        let output = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .prefix(prefix)
            .max_keys(max_keys)
            .send()
            .await?;

        let objects = output
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or_default(),
                last_modified: object
                    .last_modified()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
            })
            .collect();

        Ok(objects)
    }
}
