//! Handlers for the `/member` resource.
//!
//! The member id is always the token subject; there is no way to address
//! another member through these routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use fourtoon_core::error::CoreError;
use fourtoon_core::member::{validate_birth, validate_gender, validate_member_name};
use fourtoon_db::models::member::{CreateMember, Member, UpdateMember};
use fourtoon_db::repositories::MemberRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMember;
use crate::middleware::rbac::SignedUpMember;
use crate::state::AppState;

/// Sign-up payload.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub birth: NaiveDate,
    pub gender: String,
}

/// GET /api/v1/member
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthMember,
) -> AppResult<Json<Member>> {
    let member = MemberRepo::find_by_id(&state.pool, auth.member_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Member", auth.member_id)))?;
    Ok(Json(member))
}

/// POST /api/v1/member
///
/// Rejects a second sign-up for the same id, including withdrawn members.
pub async fn sign_up(
    State(state): State<AppState>,
    auth: AuthMember,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<Member>)> {
    validate_member_name(&input.name)?;
    validate_birth(input.birth, Utc::now().date_naive())?;
    validate_gender(&input.gender)?;

    if MemberRepo::exists(&state.pool, auth.member_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Member {} already exists",
            auth.member_id
        ))));
    }

    let member = MemberRepo::create(
        &state.pool,
        &CreateMember {
            id: auth.member_id,
            email: auth.email,
            name: input.name.trim().to_string(),
            birth: input.birth,
            gender: input.gender,
        },
    )
    .await?;

    tracing::info!(member_id = %member.id, "Member signed up");
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT /api/v1/member
pub async fn update_me(
    State(state): State<AppState>,
    SignedUpMember(member): SignedUpMember,
    Json(mut input): Json<UpdateMember>,
) -> AppResult<Json<Member>> {
    if let Some(name) = input.name.as_mut() {
        validate_member_name(name)?;
        *name = name.trim().to_string();
    }
    if let Some(birth) = input.birth {
        validate_birth(birth, Utc::now().date_naive())?;
    }
    if let Some(gender) = input.gender.as_deref() {
        validate_gender(gender)?;
    }

    let updated = MemberRepo::update(&state.pool, member.id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Member", member.id)))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/member
///
/// Permanently removes the member and every diary they wrote.
pub async fn hard_delete(
    State(state): State<AppState>,
    auth: AuthMember,
) -> AppResult<StatusCode> {
    if MemberRepo::hard_delete_with_diaries(&state.pool, auth.member_id).await? {
        tracing::info!(member_id = %auth.member_id, "Member hard-deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Member", auth.member_id)))
    }
}

/// POST /api/v1/member/withdraw
///
/// Soft delete: the row stays but the member can no longer sign in or
/// sign up again.
pub async fn withdraw(
    State(state): State<AppState>,
    auth: AuthMember,
) -> AppResult<StatusCode> {
    if MemberRepo::soft_delete(&state.pool, auth.member_id, Utc::now()).await? {
        tracing::info!(member_id = %auth.member_id, "Member withdrew");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Member", auth.member_id)))
    }
}
