//! Integration tests for diary persistence and hashtag links.

use chrono::NaiveDate;
use fourtoon_db::models::artwork::CreateArtwork;
use fourtoon_db::models::character::CreateCharacter;
use fourtoon_db::models::diary::{CreateDiary, UpdateDiary};
use fourtoon_db::models::member::CreateMember;
use fourtoon_db::repositories::{
    ArtworkRepo, CharacterRepo, DiaryRepo, HashtagRepo, MemberRepo,
};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

struct Fixture {
    member_id: Uuid,
    character_id: i64,
}

async fn seed(pool: &PgPool) -> Fixture {
    let member = MemberRepo::create(
        pool,
        &CreateMember {
            id: Uuid::new_v4(),
            email: None,
            name: "mina".to_string(),
            birth: date(1995, 3, 14),
            gender: "FEMALE".to_string(),
        },
    )
    .await
    .unwrap();
    let artwork = ArtworkRepo::create(
        pool,
        &CreateArtwork {
            title: "Watercolor".to_string(),
            thumbnail_url: "https://cdn.example.com/artworks/1.png".to_string(),
        },
    )
    .await
    .unwrap();
    let character = CharacterRepo::create(
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
    .unwrap();
    Fixture {
        member_id: member.id,
        character_id: character.id,
    }
}

fn new_diary(character_id: i64, day: NaiveDate) -> CreateDiary {
    CreateDiary {
        character_id,
        content: "오늘은 산책을 했다".to_string(),
        diary_date: day,
        hashtags: vec![],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_diary_with_hashtags(pool: PgPool) {
    let fx = seed(&pool).await;
    let created = DiaryRepo::create(
        &pool,
        fx.member_id,
        &new_diary(fx.character_id, date(2024, 6, 1)),
        &tags(&["walk", "sunny"]),
    )
    .await
    .unwrap();

    assert_eq!(created.hashtags, tags(&["walk", "sunny"]));
    assert!(created.diary.thumbnail_url.is_none());

    let detail = DiaryRepo::find_detail(&pool, created.diary.id)
        .await
        .unwrap()
        .expect("diary should exist");
    assert_eq!(detail.diary.member_id, fx.member_id);
    assert_eq!(detail.hashtags, tags(&["walk", "sunny"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_diary_per_member_and_date(pool: PgPool) {
    let fx = seed(&pool).await;
    let day = date(2024, 6, 1);
    DiaryRepo::create(&pool, fx.member_id, &new_diary(fx.character_id, day), &[])
        .await
        .unwrap();

    assert!(DiaryRepo::exists_for_member_on(&pool, fx.member_id, day).await.unwrap());
    assert!(!DiaryRepo::exists_for_member_on(&pool, fx.member_id, date(2024, 6, 2))
        .await
        .unwrap());

    let result = DiaryRepo::create(&pool, fx.member_id, &new_diary(fx.character_id, day), &[]).await;
    assert!(result.is_err(), "Second diary on the same date should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hashtags_are_shared_between_diaries(pool: PgPool) {
    let fx = seed(&pool).await;
    DiaryRepo::create(
        &pool,
        fx.member_id,
        &new_diary(fx.character_id, date(2024, 6, 1)),
        &tags(&["walk"]),
    )
    .await
    .unwrap();
    DiaryRepo::create(
        &pool,
        fx.member_id,
        &new_diary(fx.character_id, date(2024, 6, 2)),
        &tags(&["walk", "cafe"]),
    )
    .await
    .unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hashtags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_member_newest_first_and_paged(pool: PgPool) {
    let fx = seed(&pool).await;
    for day in 1..=3 {
        let tag = format!("day{day}");
        DiaryRepo::create(
            &pool,
            fx.member_id,
            &new_diary(fx.character_id, date(2024, 6, day)),
            &[tag],
        )
        .await
        .unwrap();
    }

    let page = DiaryRepo::list_by_member(&pool, fx.member_id, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].diary.diary_date, date(2024, 6, 3));
    assert_eq!(page[0].hashtags, tags(&["day3"]));
    assert_eq!(page[1].diary.diary_date, date(2024, 6, 2));

    let rest = DiaryRepo::list_by_member(&pool, fx.member_id, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].diary.diary_date, date(2024, 6, 1));

    let other = DiaryRepo::list_by_member(&pool, Uuid::new_v4(), 20, 0).await.unwrap();
    assert!(other.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_hashtags_only_when_given(pool: PgPool) {
    let fx = seed(&pool).await;
    let created = DiaryRepo::create(
        &pool,
        fx.member_id,
        &new_diary(fx.character_id, date(2024, 6, 1)),
        &tags(&["walk", "sunny"]),
    )
    .await
    .unwrap();
    let id = created.diary.id;

    let content_only = UpdateDiary {
        content: Some("수정된 내용".to_string()),
        ..Default::default()
    };
    let updated = DiaryRepo::update(&pool, id, &content_only, None)
        .await
        .unwrap()
        .expect("diary should exist");
    assert_eq!(updated.diary.content, "수정된 내용");
    assert_eq!(updated.hashtags, tags(&["walk", "sunny"]));

    let rain = tags(&["rain"]);
    let replaced = DiaryRepo::update(&pool, id, &UpdateDiary::default(), Some(rain.as_slice()))
        .await
        .unwrap()
        .expect("diary should exist");
    assert_eq!(replaced.hashtags, tags(&["rain"]));

    assert!(DiaryRepo::update(&pool, 999_999, &content_only, None)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_and_remove_hashtag(pool: PgPool) {
    let fx = seed(&pool).await;
    let created = DiaryRepo::create(
        &pool,
        fx.member_id,
        &new_diary(fx.character_id, date(2024, 6, 1)),
        &tags(&["walk"]),
    )
    .await
    .unwrap();
    let id = created.diary.id;

    assert!(DiaryRepo::add_hashtag(&pool, id, "cafe").await.unwrap());
    assert!(!DiaryRepo::add_hashtag(&pool, id, "cafe").await.unwrap());
    assert_eq!(
        HashtagRepo::list_for_diary(&pool, id).await.unwrap(),
        tags(&["walk", "cafe"])
    );

    assert!(DiaryRepo::remove_hashtag(&pool, id, "walk").await.unwrap());
    assert!(!DiaryRepo::remove_hashtag(&pool, id, "walk").await.unwrap());
    assert_eq!(HashtagRepo::list_for_diary(&pool, id).await.unwrap(), tags(&["cafe"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_thumbnail_and_delete(pool: PgPool) {
    let fx = seed(&pool).await;
    let created = DiaryRepo::create(
        &pool,
        fx.member_id,
        &new_diary(fx.character_id, date(2024, 6, 1)),
        &tags(&["walk"]),
    )
    .await
    .unwrap();
    let id = created.diary.id;

    assert!(DiaryRepo::update_thumbnail(&pool, id, "1/1.png").await.unwrap());
    let diary = DiaryRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(diary.thumbnail_url.as_deref(), Some("1/1.png"));

    assert!(DiaryRepo::delete(&pool, id).await.unwrap());
    assert!(!DiaryRepo::delete(&pool, id).await.unwrap());

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM diary_hashtags WHERE diary_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_member(pool: PgPool) {
    let fx = seed(&pool).await;
    for day in 1..=2 {
        DiaryRepo::create(
            &pool,
            fx.member_id,
            &new_diary(fx.character_id, date(2024, 6, day)),
            &[],
        )
        .await
        .unwrap();
    }

    assert_eq!(DiaryRepo::delete_by_member(&pool, fx.member_id).await.unwrap(), 2);
    assert!(DiaryRepo::list_by_member(&pool, fx.member_id, 20, 0)
        .await
        .unwrap()
        .is_empty());
}
