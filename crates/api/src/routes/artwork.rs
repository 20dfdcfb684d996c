use axum::routing::get;
use axum::Router;

use crate::handlers::artwork;
use crate::state::AppState;

/// Routes mounted at `/artwork`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create (admin)
/// GET    /{id}   -> get_by_id
/// DELETE /{id}   -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(artwork::list).post(artwork::create))
        .route("/{id}", get(artwork::get_by_id).delete(artwork::delete))
}
