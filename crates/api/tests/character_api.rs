//! HTTP-level integration tests for `/artwork` and `/character`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_admin, seed_artwork,
    seed_character, seed_member, token_for,
};
use sqlx::PgPool;
use uuid::Uuid;

fn character_body(artwork_id: i64) -> serde_json::Value {
    serde_json::json!({
        "name": "Cookie",
        "artwork_id": artwork_id,
        "selection_thumbnail_url": "https://cdn.example.com/characters/cookie.png",
        "base_prompt": "cute cookie mascot",
    })
}

// ---------------------------------------------------------------------------
// Artwork
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_and_deletes_artwork(pool: PgPool) {
    let (_, admin) = seed_admin(&pool, "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/artwork",
        serde_json::json!({ "title": "Ink", "thumbnail_url": "https://cdn.example.com/ink.png" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/artwork/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Ink");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/artwork/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/artwork/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_cannot_create_artwork(pool: PgPool) {
    let (_, token) = seed_member(&pool, "haru").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/artwork",
        serde_json::json!({ "title": "Ink", "thumbnail_url": "https://cdn.example.com/ink.png" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn artwork_list_requires_sign_up(pool: PgPool) {
    let token = token_for(Uuid::new_v4());

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/artwork", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_character_defaults_to_free(pool: PgPool) {
    let (_, admin) = seed_admin(&pool, "admin").await;
    let artwork_id = seed_artwork(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/character", character_body(artwork_id), &admin).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Cookie");
    assert_eq!(json["payment_type"], "FREE");
    assert_eq!(json["artwork_id"], artwork_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_character_with_missing_artwork_returns_404(pool: PgPool) {
    let (_, admin) = seed_admin(&pool, "admin").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/character", character_body(999_999), &admin).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_character_name_returns_409(pool: PgPool) {
    let (_, admin) = seed_admin(&pool, "admin").await;
    let artwork_id = seed_artwork(&pool).await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(app, "/api/v1/character", character_body(artwork_id), &admin).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/character", character_body(artwork_id), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_payment_type_returns_400(pool: PgPool) {
    let (_, admin) = seed_admin(&pool, "admin").await;
    let artwork_id = seed_artwork(&pool).await;
    let mut body = character_body(artwork_id);
    body["payment_type"] = serde_json::json!("TRIAL");

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/character", body, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_characters_wraps_in_characters_key(pool: PgPool) {
    let (_, token) = seed_member(&pool, "haru").await;
    seed_character(&pool, "Cookie", None).await;
    seed_character(&pool, "Mochi", Some(42)).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/character", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let characters = json["characters"].as_array().unwrap();
    assert_eq!(characters.len(), 2);
    assert_eq!(characters[0]["name"], "Cookie");
    assert_eq!(characters[1]["discord_channel_id"], 42);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_character_returns_204(pool: PgPool) {
    let (_, admin) = seed_admin(&pool, "admin").await;
    let id = seed_character(&pool, "Cookie", None).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/character/{id}"),
        serde_json::json!({ "payment_type": "PAID" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &format!("/api/v1/character/{id}"), &admin).await).await;
    assert_eq!(json["payment_type"], "PAID");
    assert_eq!(json["name"], "Cookie");

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        "/api/v1/character/999999",
        serde_json::json!({ "name": "Ghost" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_character_returns_204_then_404(pool: PgPool) {
    let (_, admin) = seed_admin(&pool, "admin").await;
    let id = seed_character(&pool, "Cookie", None).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/character/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/character/{id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
