//! Handlers for the `/character` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fourtoon_core::character::{validate_character_name, validate_payment_type};
use fourtoon_core::error::CoreError;
use fourtoon_core::types::DbId;
use fourtoon_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use fourtoon_db::repositories::{ArtworkRepo, CharacterRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, SignedUpMember};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CharacterList {
    pub characters: Vec<Character>,
}

/// GET /api/v1/character
pub async fn list(
    State(state): State<AppState>,
    _member: SignedUpMember,
) -> AppResult<Json<CharacterList>> {
    let characters = CharacterRepo::list(&state.pool).await?;
    Ok(Json(CharacterList { characters }))
}

/// GET /api/v1/character/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _member: SignedUpMember,
    Path(id): Path<DbId>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Character", id)))?;
    Ok(Json(character))
}

/// POST /api/v1/character
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    validate_character_name(&input.name)?;
    if let Some(payment_type) = input.payment_type.as_deref() {
        validate_payment_type(payment_type)?;
    }
    ensure_artwork_exists(&state, input.artwork_id).await?;

    let character = CharacterRepo::create(&state.pool, &input).await?;
    tracing::info!(character_id = character.id, name = %character.name, "Character created");
    Ok((StatusCode::CREATED, Json(character)))
}

/// PUT /api/v1/character/{id}
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<StatusCode> {
    if let Some(name) = input.name.as_deref() {
        validate_character_name(name)?;
    }
    if let Some(payment_type) = input.payment_type.as_deref() {
        validate_payment_type(payment_type)?;
    }
    if let Some(artwork_id) = input.artwork_id {
        ensure_artwork_exists(&state, artwork_id).await?;
    }

    CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Character", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/character/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CharacterRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Character", id)))
    }
}

async fn ensure_artwork_exists(state: &AppState, artwork_id: DbId) -> AppResult<()> {
    if ArtworkRepo::exists(&state.pool, artwork_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::not_found("Artwork", artwork_id)))
    }
}
