/// Failure reported by an [`ObjectStore`](crate::s3::ObjectStore) backend.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Errors raised by the AWS integration layer.
///
/// Every S3 variant names the object key it failed on.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("Failed to upload image to S3. Key: {key}")]
    S3Upload {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Image does not exist in S3. Key: {key}")]
    S3ImageNotFound { key: String },

    #[error("Failed to generate presigned URL from S3. Key: {key}")]
    S3PreSignUrl {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to check image existence in S3. Key: {key}")]
    S3ImageExistenceCheck {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to load CloudFront private key: {0}")]
    CloudFrontKey(String),

    #[error("Failed to send SQS message: {0}")]
    Sqs(String),

    #[error("Failed to serialize queue message: {0}")]
    Serialization(#[from] serde_json::Error),
}
