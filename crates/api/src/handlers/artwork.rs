//! Handlers for the `/artwork` resource (art styles offered to characters).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fourtoon_core::error::CoreError;
use fourtoon_core::types::DbId;
use fourtoon_db::models::artwork::{Artwork, CreateArtwork};
use fourtoon_db::repositories::ArtworkRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, SignedUpMember};
use crate::state::AppState;

/// GET /api/v1/artwork
pub async fn list(
    State(state): State<AppState>,
    _member: SignedUpMember,
) -> AppResult<Json<Vec<Artwork>>> {
    Ok(Json(ArtworkRepo::list(&state.pool).await?))
}

/// GET /api/v1/artwork/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _member: SignedUpMember,
    Path(id): Path<DbId>,
) -> AppResult<Json<Artwork>> {
    let artwork = ArtworkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Artwork", id)))?;
    Ok(Json(artwork))
}

/// POST /api/v1/artwork
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<CreateArtwork>,
) -> AppResult<(StatusCode, Json<Artwork>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be blank".into(),
        )));
    }
    let artwork = ArtworkRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(artwork)))
}

/// DELETE /api/v1/artwork/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ArtworkRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Artwork", id)))
    }
}
