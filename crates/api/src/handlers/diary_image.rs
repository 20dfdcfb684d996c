//! Panel image access and generation for one diary.
//!
//! Images live in S3 under `{diary_id}/{grid_position}.png` and are served
//! either through presigned S3 URLs or through CloudFront (signed URLs or
//! signed cookies covering `{diary_id}/*`).

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::Json;
use fourtoon_cloud::CloudError;
use fourtoon_core::character::compose_panel_prompt;
use fourtoon_core::diary::{grid_positions, image_key, image_key_prefix_pattern, validate_scene_count};
use fourtoon_core::error::CoreError;
use fourtoon_core::types::DbId;
use fourtoon_db::repositories::CharacterRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::diary::load_owned_diary;
use crate::middleware::rbac::SignedUpMember;
use crate::state::AppState;

/// One panel image URL.
#[derive(Debug, Serialize)]
pub struct PanelImage {
    pub grid_position: i16,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PanelImages {
    pub diary_id: DbId,
    pub images: Vec<PanelImage>,
}

/// Body of `POST /diary/{id}/panels`: one scene description per panel,
/// in grid order.
#[derive(Debug, Deserialize)]
pub struct GeneratePanelsRequest {
    pub scenes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QueuedPanel {
    pub grid_position: i16,
    pub channel_id: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePanelsResponse {
    pub diary_id: DbId,
    pub queued: Vec<QueuedPanel>,
}

/// GET /api/v1/diary/{id}/images
///
/// Presigned S3 URLs for the panels uploaded so far; missing panels are
/// left out.
pub async fn presigned_images(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
) -> AppResult<Json<PanelImages>> {
    load_owned_diary(&state, &member, id).await?;

    let mut images = Vec::new();
    for grid_position in grid_positions() {
        match state.images.generate_presigned_image_url(id, grid_position).await {
            Ok(url) => images.push(PanelImage { grid_position, url }),
            Err(CloudError::S3ImageNotFound { .. }) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Json(PanelImages {
        diary_id: id,
        images,
    }))
}

/// GET /api/v1/diary/{id}/images/signed
pub async fn signed_images(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
) -> AppResult<Json<PanelImages>> {
    let signer = state
        .cloudfront
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("CloudFront is not configured".into()))?;
    load_owned_diary(&state, &member, id).await?;

    let images = grid_positions()
        .map(|grid_position| PanelImage {
            grid_position,
            url: signer.signed_url(&image_key(id, grid_position)),
        })
        .collect();
    Ok(Json(PanelImages {
        diary_id: id,
        images,
    }))
}

/// GET /api/v1/diary/{id}/images/cookies
///
/// Sets the three CloudFront cookies for every panel of the diary.
pub async fn signed_cookies(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, AppendHeaders<[(axum::http::HeaderName, String); 3]>)> {
    let signer = state
        .cloudfront
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("CloudFront is not configured".into()))?;
    load_owned_diary(&state, &member, id).await?;

    let cookies = signer.signed_cookies(&image_key_prefix_pattern(id));
    let headers = cookies
        .pairs()
        .map(|(name, value)| (SET_COOKIE, format!("{name}={value}; Path=/; Secure; HttpOnly")));
    Ok((StatusCode::NO_CONTENT, AppendHeaders(headers)))
}

/// POST /api/v1/diary/{id}/panels
///
/// Queues one Midjourney prompt per scene. Panels are drawn asynchronously
/// and stored by the panel ingest task as they complete.
pub async fn generate_panels(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
    Json(input): Json<GeneratePanelsRequest>,
) -> AppResult<(StatusCode, Json<GeneratePanelsResponse>)> {
    let manager = state
        .midjourney
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("Midjourney is not configured".into()))?;
    let diary = load_owned_diary(&state, &member, id).await?;
    validate_scene_count(input.scenes.len())?;

    let character = CharacterRepo::find_by_id(&state.pool, diary.character_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Character", diary.character_id)))?;
    let character_channel = character
        .discord_channel_id
        .and_then(|channel| u64::try_from(channel).ok());

    let panels = grid_positions()
        .zip(&input.scenes)
        .map(|(grid_position, scene)| {
            (grid_position, compose_panel_prompt(&character.base_prompt, scene))
        })
        .collect();
    let queued: Vec<QueuedPanel> = manager
        .push_panels(id, panels, character_channel)
        .await?
        .into_iter()
        .map(|request| QueuedPanel {
            grid_position: request.grid_position,
            channel_id: request.channel_id.to_string(),
        })
        .collect();

    tracing::info!(diary_id = id, panels = queued.len(), "Panel generation queued");
    Ok((
        StatusCode::ACCEPTED,
        Json(GeneratePanelsResponse {
            diary_id: id,
            queued,
        }),
    ))
}
