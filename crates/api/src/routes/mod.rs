pub mod artwork;
pub mod character;
pub mod diary;
pub mod health;
pub mod member;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /member      sign-up, profile, withdrawal
/// /artwork     art styles (admin writes)
/// /character   characters (admin writes)
/// /diary       diaries, hashtags, panel images
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/member", member::router())
        .nest("/artwork", artwork::router())
        .nest("/character", character::router())
        .nest("/diary", diary::router())
}
