//! Route definitions for diaries and their sub-resources.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{diary, diary_image};
use crate::state::AppState;

/// Routes mounted at `/diary`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
///
/// POST   /{id}/hashtags            -> add_hashtag
/// DELETE /{id}/hashtags/{name}     -> remove_hashtag
///
/// GET    /{id}/images              -> presigned_images
/// GET    /{id}/images/signed       -> signed_images
/// GET    /{id}/images/cookies      -> signed_cookies
/// POST   /{id}/panels              -> generate_panels
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(diary::list).post(diary::create))
        .route(
            "/{id}",
            get(diary::get_by_id)
                .put(diary::update)
                .delete(diary::delete),
        )
        .route("/{id}/hashtags", post(diary::add_hashtag))
        .route("/{id}/hashtags/{name}", delete(diary::remove_hashtag))
        .route("/{id}/images", get(diary_image::presigned_images))
        .route("/{id}/images/signed", get(diary_image::signed_images))
        .route("/{id}/images/cookies", get(diary_image::signed_cookies))
        .route("/{id}/panels", post(diary_image::generate_panels))
}
