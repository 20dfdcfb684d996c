//! Diary panel images in S3.
//!
//! [`ObjectStore`] is the seam between the storage rules and the SDK;
//! [`S3ObjectStore`] is the production backend and tests substitute an
//! in-memory one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use fourtoon_core::diary::{image_key, PANEL_CONTENT_TYPE};
use fourtoon_core::types::DbId;

use crate::error::{CloudError, StoreError};

/// Default lifetime of presigned download URLs.
pub const DEFAULT_PRESIGN_MINUTES: u64 = 60;

/// Longest lifetime S3 accepts for a presigned URL (seven days).
pub const MAX_PRESIGN_MINUTES: u64 = 7 * 24 * 60;

/// Minimal object storage operations needed for diary images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// `Ok(false)` when the object does not exist.
    async fn head_object(&self, key: &str) -> Result<bool, StoreError>;

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError>;
}

// ---------------------------------------------------------------------------
// S3 backend
// ---------------------------------------------------------------------------

/// [`ObjectStore`] over a single S3 bucket.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn from_sdk_config(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self::new(aws_sdk_s3::Client::new(config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn store_error<E: std::error::Error>(err: E) -> StoreError {
    StoreError(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<bool, StoreError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(store_error(err)),
        }
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        let config = PresigningConfig::expires_in(expires_in).map_err(store_error)?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(store_error)?;
        Ok(request.uri().to_string())
    }
}

// ---------------------------------------------------------------------------
// Diary image storage
// ---------------------------------------------------------------------------

/// Stores the four panel images of each diary under `{diary_id}/{grid_position}.png`.
#[derive(Clone)]
pub struct DiaryImageStorage {
    store: Arc<dyn ObjectStore>,
    presign_duration: Duration,
}

impl DiaryImageStorage {
    /// `presign_minutes` is clamped to `1..=MAX_PRESIGN_MINUTES`.
    pub fn new(store: Arc<dyn ObjectStore>, presign_minutes: u64) -> Self {
        let minutes = presign_minutes.clamp(1, MAX_PRESIGN_MINUTES);
        Self {
            store,
            presign_duration: Duration::from_secs(minutes * 60),
        }
    }

    pub fn presign_duration(&self) -> Duration {
        self.presign_duration
    }

    /// Upload one panel as PNG. Returns the object key.
    pub async fn upload_image(
        &self,
        diary_id: DbId,
        image: Vec<u8>,
        grid_position: i16,
    ) -> Result<String, CloudError> {
        let key = image_key(diary_id, grid_position);
        let size = image.len();
        self.store
            .put_object(&key, image, PANEL_CONTENT_TYPE)
            .await
            .map_err(|source| {
                tracing::error!(key = %key, error = %source, "S3 upload failed");
                CloudError::S3Upload {
                    key: key.clone(),
                    source,
                }
            })?;
        tracing::info!(key = %key, bytes = size, "Uploaded diary image");
        Ok(key)
    }

    pub async fn is_image_exist(&self, diary_id: DbId, grid_position: i16) -> Result<bool, CloudError> {
        let key = image_key(diary_id, grid_position);
        self.store
            .head_object(&key)
            .await
            .map_err(|source| CloudError::S3ImageExistenceCheck { key, source })
    }

    /// Presign a download URL for one panel.
    ///
    /// Fails with [`CloudError::S3ImageNotFound`] without contacting the
    /// presigner when the image has not been uploaded.
    pub async fn generate_presigned_image_url(
        &self,
        diary_id: DbId,
        grid_position: i16,
    ) -> Result<String, CloudError> {
        let key = image_key(diary_id, grid_position);
        if !self.is_image_exist(diary_id, grid_position).await? {
            return Err(CloudError::S3ImageNotFound { key });
        }
        self.store
            .presign_get(&key, self.presign_duration)
            .await
            .map_err(|source| CloudError::S3PreSignUrl { key, source })
    }
}
