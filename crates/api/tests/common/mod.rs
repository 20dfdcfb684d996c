#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use fourtoon_api::auth::jwt::{generate_access_token, JwtConfig};
use fourtoon_api::config::{ServerConfig, StorageConfig};
use fourtoon_api::router::build_app_router;
use fourtoon_api::state::AppState;
use fourtoon_cloud::{CloudFrontSigner, DiaryImageStorage, ObjectStore, StoreError};
use fourtoon_db::models::artwork::CreateArtwork;
use fourtoon_db::models::character::CreateCharacter;
use fourtoon_db::models::member::CreateMember;
use fourtoon_db::repositories::{ArtworkRepo, CharacterRepo, MemberRepo};
use fourtoon_midjourney::{DiscordGateway, MidjourneyConfig, MidjourneyError, MidjourneyManager};

pub const TEST_JWT_SECRET: &str = "test-secret-for-fourtoon";
pub const CLOUDFRONT_DOMAIN: &str = "d111111abcdef8.cloudfront.net";
pub const CLOUDFRONT_KEY_PAIR_ID: &str = "K2JCJMDEHXQW5F";
pub const DEFAULT_CHANNEL_ID: u64 = 100;
const CLOUDFRONT_PEM: &str = include_str!("../../../cloud/tests/fixtures/cloudfront_pkcs8.pem");

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        storage: StorageConfig {
            region: "ap-northeast-2".to_string(),
            diary_image_bucket: "test-bucket".to_string(),
            presign_minutes: 60,
        },
        cloudfront: None,
        sqs: None,
        discord: None,
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Object store kept in memory. Presigned URLs are deterministic.
#[derive(Default)]
pub struct InMemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn insert(&self, key: &str, body: &[u8]) {
        self.objects.lock().unwrap().insert(key.to_string(), body.to_vec());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        Ok(format!(
            "https://test-bucket.s3.amazonaws.com/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }
}

/// Discord gateway that accepts every call without sending anything.
pub struct NoopGateway;

#[async_trait]
impl DiscordGateway for NoopGateway {
    async fn submit_prompt(&self, _channel_id: u64, _prompt: &str) -> Result<u64, MidjourneyError> {
        Ok(1)
    }

    async fn request_upscale(
        &self,
        _channel_id: u64,
        _grid_message_id: u64,
        _index: u8,
    ) -> Result<(), MidjourneyError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Full state: in-memory S3, CloudFront signer and an idle Midjourney
/// manager whose default channel is [`DEFAULT_CHANNEL_ID`].
pub fn test_state(pool: PgPool) -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let images = DiaryImageStorage::new(store.clone(), 60);

    let signer = CloudFrontSigner::from_pem(CLOUDFRONT_DOMAIN, CLOUDFRONT_KEY_PAIR_ID, CLOUDFRONT_PEM)
        .expect("fixture key should parse");

    let mut mj_config = MidjourneyConfig::new(999);
    mj_config.default_channel_id = Some(DEFAULT_CHANNEL_ID);
    let manager = MidjourneyManager::new(Arc::new(NoopGateway), mj_config);

    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        images,
        cloudfront: Some(Arc::new(signer)),
        diary_queue: None,
        midjourney: Some(manager),
    };
    (state, store)
}

pub fn build_app(state: AppState) -> Router {
    let config = test_config();
    build_app_router(state, &config)
}

/// Build the full application router over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(test_state(pool).0)
}

// ---------------------------------------------------------------------------
// Auth and seed helpers
// ---------------------------------------------------------------------------

pub fn token_for(member_id: Uuid) -> String {
    generate_access_token(member_id, Some("member@example.com"), &test_config().jwt)
        .expect("token generation should succeed")
}

/// Insert a signed-up member and return their id and token.
pub async fn seed_member(pool: &PgPool, name: &str) -> (Uuid, String) {
    let id = Uuid::new_v4();
    MemberRepo::create(
        pool,
        &CreateMember {
            id,
            email: Some(format!("{name}@example.com")),
            name: name.to_string(),
            birth: NaiveDate::from_ymd_opt(1995, 3, 14).unwrap(),
            gender: "FEMALE".to_string(),
        },
    )
    .await
    .expect("member creation should succeed");
    (id, token_for(id))
}

pub async fn seed_admin(pool: &PgPool, name: &str) -> (Uuid, String) {
    let (id, token) = seed_member(pool, name).await;
    sqlx::query("UPDATE members SET role = 'ADMIN' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    (id, token)
}

pub async fn seed_artwork(pool: &PgPool) -> i64 {
    ArtworkRepo::create(
        pool,
        &CreateArtwork {
            title: "Watercolor".to_string(),
            thumbnail_url: "https://cdn.example.com/artworks/1.png".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_character(pool: &PgPool, name: &str, discord_channel_id: Option<i64>) -> i64 {
    let artwork_id = seed_artwork(pool).await;
    CharacterRepo::create(
        pool,
        &CreateCharacter {
            name: name.to_string(),
            payment_type: None,
            artwork_id,
            selection_thumbnail_url: "https://cdn.example.com/characters/1.png".to_string(),
            base_prompt: Some("cute cookie mascot, pastel".to_string()),
            discord_channel_id,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
