//! Integration tests for member persistence.
//!
//! Covers sign-up, profile updates, soft delete visibility and the
//! hard delete that removes a member together with their diaries.

use chrono::{NaiveDate, Utc};
use fourtoon_db::models::artwork::CreateArtwork;
use fourtoon_db::models::character::CreateCharacter;
use fourtoon_db::models::diary::CreateDiary;
use fourtoon_db::models::member::{CreateMember, UpdateMember};
use fourtoon_db::repositories::{ArtworkRepo, CharacterRepo, DiaryRepo, MemberRepo};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_member(name: &str) -> CreateMember {
    CreateMember {
        id: Uuid::new_v4(),
        email: Some(format!("{name}@example.com")),
        name: name.to_string(),
        birth: date(1995, 3, 14),
        gender: "FEMALE".to_string(),
    }
}

async fn seed_character(pool: &PgPool) -> i64 {
    let artwork = ArtworkRepo::create(
        pool,
        &CreateArtwork {
            title: "Watercolor".to_string(),
            thumbnail_url: "https://cdn.example.com/artworks/1.png".to_string(),
        },
    )
    .await
    .unwrap();
    CharacterRepo::create(
        pool,
        &CreateCharacter {
            name: "Cookie".to_string(),
            payment_type: None,
            artwork_id: artwork.id,
            selection_thumbnail_url: "https://cdn.example.com/characters/1.png".to_string(),
            base_prompt: None,
            discord_channel_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_member_defaults_to_member_role(pool: PgPool) {
    let input = new_member("mina");
    let member = MemberRepo::create(&pool, &input).await.unwrap();

    assert_eq!(member.id, input.id);
    assert_eq!(member.role, "MEMBER");
    assert!(member.is_signed_up());
    assert!(!member.is_admin());
    assert!(member.deleted_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_member_id_rejected(pool: PgPool) {
    let input = new_member("mina");
    MemberRepo::create(&pool, &input).await.unwrap();

    let result = MemberRepo::create(&pool, &input).await;
    assert!(result.is_err(), "Duplicate member id should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_applies_only_given_fields(pool: PgPool) {
    let member = MemberRepo::create(&pool, &new_member("mina")).await.unwrap();

    let updated = MemberRepo::update(
        &pool,
        member.id,
        &UpdateMember {
            name: Some("minji".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("member should exist");

    assert_eq!(updated.name.as_deref(), Some("minji"));
    assert_eq!(updated.birth, member.birth);
    assert_eq!(updated.gender, member.gender);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_member_hidden_but_still_exists(pool: PgPool) {
    let member = MemberRepo::create(&pool, &new_member("mina")).await.unwrap();

    assert!(MemberRepo::soft_delete(&pool, member.id, Utc::now()).await.unwrap());
    // Second call is a no-op.
    assert!(!MemberRepo::soft_delete(&pool, member.id, Utc::now()).await.unwrap());

    assert!(MemberRepo::find_by_id(&pool, member.id).await.unwrap().is_none());
    assert!(MemberRepo::exists(&pool, member.id).await.unwrap());
    assert!(MemberRepo::update(&pool, member.id, &UpdateMember::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_removes_member_and_diaries(pool: PgPool) {
    let member = MemberRepo::create(&pool, &new_member("mina")).await.unwrap();
    let character_id = seed_character(&pool).await;

    let detail = DiaryRepo::create(
        &pool,
        member.id,
        &CreateDiary {
            character_id,
            content: "비 오는 날".to_string(),
            diary_date: date(2024, 6, 1),
            hashtags: vec![],
        },
        &["rain".to_string()],
    )
    .await
    .unwrap();

    assert!(MemberRepo::hard_delete_with_diaries(&pool, member.id).await.unwrap());

    assert!(!MemberRepo::exists(&pool, member.id).await.unwrap());
    assert!(DiaryRepo::find_by_id(&pool, detail.diary.id).await.unwrap().is_none());
    // Characters are shared and survive.
    assert!(CharacterRepo::find_by_id(&pool, character_id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_unknown_member_returns_false(pool: PgPool) {
    let deleted = MemberRepo::hard_delete_with_diaries(&pool, Uuid::new_v4())
        .await
        .unwrap();
    assert!(!deleted);
}
