//! AWS integration for diary artwork.
//!
//! - [`s3`]: panel image upload, existence checks and presigned downloads.
//! - [`cloudfront`]: canned-policy signed URLs and cookies for the CDN.
//! - [`sqs`]: diary-created notifications for downstream workers.

pub mod cloudfront;
pub mod error;
pub mod s3;
pub mod sqs;

pub use cloudfront::{CloudFrontSigner, SignedCookies};
pub use error::{CloudError, StoreError};
pub use s3::{DiaryImageStorage, ObjectStore, S3ObjectStore};
pub use sqs::{DiaryCreatedMessage, DiaryQueuePublisher};

/// Default AWS region for every client built from configuration.
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Load the shared AWS SDK configuration for `region` from the default
/// credential provider chain.
pub async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}
