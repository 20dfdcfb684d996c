//! Liveness endpoint, mounted at the root next to `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when Postgres does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub integrations: Integrations,
}

/// Optional integrations switched on by configuration.
#[derive(Serialize)]
pub struct Integrations {
    pub cloudfront: bool,
    pub sqs: bool,
    pub midjourney: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = fourtoon_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        integrations: Integrations {
            cloudfront: state.cloudfront.is_some(),
            sqs: state.diary_queue.is_some(),
            midjourney: state.midjourney.is_some(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
