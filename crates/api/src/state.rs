use std::sync::Arc;

use fourtoon_cloud::{CloudFrontSigner, DiaryImageStorage, DiaryQueuePublisher};
use fourtoon_midjourney::MidjourneyManager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fourtoon_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Panel images in S3.
    pub images: DiaryImageStorage,
    /// CDN signer; `None` when CloudFront is not configured.
    pub cloudfront: Option<Arc<CloudFrontSigner>>,
    /// Diary-created publisher; `None` when SQS is not configured.
    pub diary_queue: Option<Arc<DiaryQueuePublisher>>,
    /// Midjourney dispatcher; `None` when Discord is not configured.
    pub midjourney: Option<Arc<MidjourneyManager>>,
}
