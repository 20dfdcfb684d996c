//! Stores finished Midjourney panels.
//!
//! Listens for [`MidjourneyEvent::PanelCompleted`], downloads the upscaled
//! image from Discord's CDN and uploads it to the diary image bucket. The
//! first panel also becomes the diary's thumbnail.

use std::sync::Arc;
use std::time::Duration;

use fourtoon_cloud::{CloudError, CloudFrontSigner, DiaryImageStorage};
use fourtoon_core::types::DbId;
use fourtoon_db::repositories::DiaryRepo;
use fourtoon_midjourney::MidjourneyEvent;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Grid position whose image is used as the diary thumbnail.
pub const THUMBNAIL_GRID_POSITION: i16 = 1;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to download panel image from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Everything the ingest task needs besides the event stream.
#[derive(Clone)]
pub struct PanelIngest {
    pub pool: PgPool,
    pub images: DiaryImageStorage,
    pub cloudfront: Option<Arc<CloudFrontSigner>>,
    pub http: reqwest::Client,
}

impl PanelIngest {
    pub fn new(
        pool: PgPool,
        images: DiaryImageStorage,
        cloudfront: Option<Arc<CloudFrontSigner>>,
    ) -> Result<Self, IngestError> {
        let http = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(IngestError::HttpClient)?;
        Ok(Self {
            pool,
            images,
            cloudfront,
            http,
        })
    }

    /// Download and store one completed panel.
    pub async fn ingest(
        &self,
        diary_id: DbId,
        grid_position: i16,
        image_url: &str,
    ) -> Result<String, IngestError> {
        let image = self.download(image_url).await?;
        self.store(diary_id, grid_position, image).await
    }

    /// Upload panel bytes and, for the first panel, record the thumbnail.
    ///
    /// Returns the object key.
    pub async fn store(
        &self,
        diary_id: DbId,
        grid_position: i16,
        image: Vec<u8>,
    ) -> Result<String, IngestError> {
        let key = self.images.upload_image(diary_id, image, grid_position).await?;

        if grid_position == THUMBNAIL_GRID_POSITION {
            let thumbnail_url = match &self.cloudfront {
                Some(signer) => signer.resource_url(&key),
                None => key.clone(),
            };
            if !DiaryRepo::update_thumbnail(&self.pool, diary_id, &thumbnail_url).await? {
                tracing::warn!(diary_id, "Diary vanished before its thumbnail was stored");
            }
        }
        Ok(key)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let to_err = |source| IngestError::Download {
            url: url.to_string(),
            source,
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(to_err)?;
        let bytes = response.bytes().await.map_err(to_err)?;
        Ok(bytes.to_vec())
    }
}

/// Run the ingest loop until `cancel` fires or the event channel closes.
pub async fn run(
    ingest: PanelIngest,
    mut events: broadcast::Receiver<MidjourneyEvent>,
    cancel: CancellationToken,
) {
    tracing::info!("Panel ingest started");

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Panel ingest stopping");
                break;
            }
            received = events.recv() => received,
        };

        match event {
            Ok(MidjourneyEvent::PanelCompleted {
                diary_id,
                grid_position,
                image_url,
            }) => match ingest.ingest(diary_id, grid_position, &image_url).await {
                Ok(key) => tracing::info!(diary_id, grid_position, key = %key, "Panel stored"),
                Err(e) => {
                    tracing::error!(diary_id, grid_position, error = %e, "Panel ingest failed")
                }
            },
            Ok(MidjourneyEvent::PanelFailed {
                diary_id,
                grid_position,
                reason,
            }) => {
                tracing::warn!(diary_id, grid_position, reason = %reason, "Panel generation failed");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Panel ingest lagged behind Midjourney events");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("Midjourney event channel closed");
                break;
            }
        }
    }
}
