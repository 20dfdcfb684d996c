//! Member-state and role extractors.
//!
//! Each extractor wraps [`AuthMember`], loads the member row and rejects
//! the request with 403 Forbidden when the member does not qualify.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fourtoon_core::error::CoreError;
use fourtoon_db::models::member::Member;
use fourtoon_db::repositories::MemberRepo;

use super::auth::AuthMember;
use crate::error::AppError;
use crate::state::AppState;

/// An active (not withdrawn) member with a non-empty name.
///
/// ```ignore
/// async fn list(SignedUpMember(member): SignedUpMember) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct SignedUpMember(pub Member);

impl FromRequestParts<AppState> for SignedUpMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthMember::from_request_parts(parts, state).await?;
        let member = MemberRepo::find_by_id(&state.pool, auth.member_id)
            .await?
            .filter(Member::is_signed_up)
            .ok_or_else(|| AppError::Core(CoreError::Forbidden("Sign-up required".into())))?;
        Ok(SignedUpMember(member))
    }
}

/// Requires the `ADMIN` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub Member);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SignedUpMember(member) = SignedUpMember::from_request_parts(parts, state).await?;
        if !member.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(member))
    }
}
