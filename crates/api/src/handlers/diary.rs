//! Handlers for the `/diary` resource and its hashtags.
//!
//! Every route except create/list addresses a single diary and requires the
//! caller to own it: unknown ids answer 404, other members' diaries 403.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fourtoon_cloud::DiaryCreatedMessage;
use fourtoon_core::diary::{
    normalize_hashtag, normalize_hashtags, validate_content, MAX_HASHTAGS_PER_DIARY,
};
use fourtoon_core::error::CoreError;
use fourtoon_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use fourtoon_core::types::DbId;
use fourtoon_db::models::diary::{CreateDiary, Diary, DiaryDetail, UpdateDiary};
use fourtoon_db::models::member::Member;
use fourtoon_db::repositories::{CharacterRepo, DiaryRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::SignedUpMember;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /diary/{id}/hashtags`.
#[derive(Debug, Deserialize)]
pub struct AddHashtagRequest {
    pub name: String,
}

/// POST /api/v1/diary
///
/// One diary per member per day; a second diary for the same date is a
/// conflict.
pub async fn create(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Json(input): Json<CreateDiary>,
) -> AppResult<(StatusCode, Json<DiaryDetail>)> {
    validate_content(&input.content)?;
    let hashtags = normalize_hashtags(&input.hashtags)?;
    ensure_character_exists(&state, input.character_id).await?;

    if DiaryRepo::exists_for_member_on(&state.pool, member.id, input.diary_date).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A diary for {} already exists",
            input.diary_date
        ))));
    }

    let detail = DiaryRepo::create(&state.pool, member.id, &input, &hashtags).await?;
    tracing::info!(
        diary_id = detail.diary.id,
        member_id = %member.id,
        date = %detail.diary.diary_date,
        "Diary created"
    );

    publish_created(&state, &detail.diary).await;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/diary
pub async fn list(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<DiaryDetail>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let diaries = DiaryRepo::list_by_member(&state.pool, member.id, limit, offset).await?;
    Ok(Json(DataResponse { data: diaries }))
}

/// GET /api/v1/diary/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
) -> AppResult<Json<DiaryDetail>> {
    load_owned_diary(&state, &member, id).await?;
    Ok(Json(find_detail(&state, id).await?))
}

/// PUT /api/v1/diary/{id}
pub async fn update(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDiary>,
) -> AppResult<Json<DiaryDetail>> {
    load_owned_diary(&state, &member, id).await?;

    if let Some(content) = input.content.as_deref() {
        validate_content(content)?;
    }
    if let Some(character_id) = input.character_id {
        ensure_character_exists(&state, character_id).await?;
    }
    let hashtags = input
        .hashtags
        .as_deref()
        .map(normalize_hashtags)
        .transpose()?;

    let detail = DiaryRepo::update(&state.pool, id, &input, hashtags.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Diary", id)))?;
    Ok(Json(detail))
}

/// DELETE /api/v1/diary/{id}
pub async fn delete(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_diary(&state, &member, id).await?;
    DiaryRepo::delete(&state.pool, id).await?;
    tracing::info!(diary_id = id, member_id = %member.id, "Diary deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/diary/{id}/hashtags
///
/// Adding a tag the diary already carries is a no-op.
pub async fn add_hashtag(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path(id): Path<DbId>,
    Json(input): Json<AddHashtagRequest>,
) -> AppResult<Json<DiaryDetail>> {
    load_owned_diary(&state, &member, id).await?;

    let name = normalize_hashtags(&[input.name])?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("hashtag must not be blank".into()))?;

    let current = find_detail(&state, id).await?;
    if current.hashtags.contains(&name) {
        return Ok(Json(current));
    }
    if current.hashtags.len() >= MAX_HASHTAGS_PER_DIARY {
        return Err(AppError::Core(CoreError::Validation(format!(
            "at most {MAX_HASHTAGS_PER_DIARY} hashtags are allowed"
        ))));
    }

    DiaryRepo::add_hashtag(&state.pool, id, &name).await?;
    Ok(Json(find_detail(&state, id).await?))
}

/// DELETE /api/v1/diary/{id}/hashtags/{name}
pub async fn remove_hashtag(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Path((id, raw_name)): Path<(DbId, String)>,
) -> AppResult<Json<DiaryDetail>> {
    load_owned_diary(&state, &member, id).await?;

    let name = normalize_hashtag(&raw_name)
        .ok_or_else(|| AppError::BadRequest("hashtag must not be blank".into()))?;
    if !DiaryRepo::remove_hashtag(&state.pool, id, &name).await? {
        return Err(AppError::Core(CoreError::not_found("Hashtag", name)));
    }
    Ok(Json(find_detail(&state, id).await?))
}

/// Load a diary and check that `member` wrote it.
pub(crate) async fn load_owned_diary(
    state: &AppState,
    member: &Member,
    id: DbId,
) -> AppResult<Diary> {
    let diary = DiaryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Diary", id)))?;
    if diary.member_id != member.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Diary belongs to another member".into(),
        )));
    }
    Ok(diary)
}

async fn find_detail(state: &AppState, id: DbId) -> AppResult<DiaryDetail> {
    DiaryRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Diary", id)))
}

async fn ensure_character_exists(state: &AppState, character_id: DbId) -> AppResult<()> {
    CharacterRepo::find_by_id(&state.pool, character_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::not_found("Character", character_id)))
}

/// Notify downstream workers. The diary is already committed, so a failed
/// publish is logged and otherwise ignored.
async fn publish_created(state: &AppState, diary: &Diary) {
    let Some(queue) = state.diary_queue.as_ref() else {
        return;
    };
    let message = DiaryCreatedMessage {
        diary_id: diary.id,
        member_id: diary.member_id,
        character_id: diary.character_id,
        content: diary.content.clone(),
        diary_date: diary.diary_date,
    };
    if let Err(e) = queue.publish_diary_created(&message).await {
        tracing::warn!(diary_id = diary.id, error = %e, "Failed to publish diary-created message");
    }
}
