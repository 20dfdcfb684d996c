use axum::routing::{get, post};
use axum::Router;

use crate::handlers::member;
use crate::state::AppState;

/// Routes mounted at `/member`.
///
/// ```text
/// GET    /           -> get_me
/// POST   /           -> sign_up
/// PUT    /           -> update_me
/// DELETE /           -> hard_delete
/// POST   /withdraw   -> withdraw
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(member::get_me)
                .post(member::sign_up)
                .put(member::update_me)
                .delete(member::hard_delete),
        )
        .route("/withdraw", post(member::withdraw))
}
