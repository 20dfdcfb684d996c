//! Repository for the `diaries` table and its hashtag links.

use chrono::NaiveDate;
use fourtoon_core::types::{DbId, MemberId};
use sqlx::PgPool;

use crate::models::diary::{CreateDiary, Diary, DiaryDetail, UpdateDiary};
use crate::repositories::HashtagRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, member_id, character_id, content, thumbnail_url, diary_date, created_at, updated_at";

/// Provides CRUD operations for diaries.
///
/// Hashtag names passed in must already be normalized.
pub struct DiaryRepo;

impl DiaryRepo {
    /// Insert a diary and its hashtag links in one transaction.
    pub async fn create(
        pool: &PgPool,
        member_id: MemberId,
        input: &CreateDiary,
        hashtags: &[String],
    ) -> Result<DiaryDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO diaries (member_id, character_id, content, diary_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let diary = sqlx::query_as::<_, Diary>(&query)
            .bind(member_id)
            .bind(input.character_id)
            .bind(&input.content)
            .bind(input.diary_date)
            .fetch_one(&mut *tx)
            .await?;

        HashtagRepo::replace_links(&mut *tx, diary.id, hashtags).await?;

        tx.commit().await?;

        Ok(DiaryDetail {
            diary,
            hashtags: hashtags.to_vec(),
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Diary>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM diaries WHERE id = $1");
        sqlx::query_as::<_, Diary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a diary together with its hashtag names.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<DiaryDetail>, sqlx::Error> {
        let Some(diary) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let hashtags = HashtagRepo::list_for_diary(pool, id).await?;
        Ok(Some(DiaryDetail { diary, hashtags }))
    }

    /// Whether the member already wrote a diary for `date`.
    pub async fn exists_for_member_on(
        pool: &PgPool,
        member_id: MemberId,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM diaries WHERE member_id = $1 AND diary_date = $2)",
        )
        .bind(member_id)
        .bind(date)
        .fetch_one(pool)
        .await
    }

    /// List a member's diaries, newest `diary_date` first, with hashtags.
    pub async fn list_by_member(
        pool: &PgPool,
        member_id: MemberId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DiaryDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM diaries
             WHERE member_id = $1
             ORDER BY diary_date DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let diaries = sqlx::query_as::<_, Diary>(&query)
            .bind(member_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = diaries.iter().map(|d| d.id).collect();
        let mut hashtags = HashtagRepo::list_for_diaries(pool, &ids).await?;

        Ok(diaries
            .into_iter()
            .map(|diary| DiaryDetail {
                hashtags: hashtags.remove(&diary.id).unwrap_or_default(),
                diary,
            })
            .collect())
    }

    /// Update a diary. Only non-`None` fields in `input` are applied; a
    /// present `hashtags` list replaces the current links.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDiary,
        hashtags: Option<&[String]>,
    ) -> Result<Option<DiaryDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE diaries SET
                character_id = COALESCE($2, character_id),
                content = COALESCE($3, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(diary) = sqlx::query_as::<_, Diary>(&query)
            .bind(id)
            .bind(input.character_id)
            .bind(&input.content)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(names) = hashtags {
            HashtagRepo::replace_links(&mut *tx, id, names).await?;
        }

        tx.commit().await?;

        let hashtags = HashtagRepo::list_for_diary(pool, id).await?;
        Ok(Some(DiaryDetail { diary, hashtags }))
    }

    /// Attach one hashtag after the existing ones.
    ///
    /// Returns `false` if the diary already carries it.
    pub async fn add_hashtag(pool: &PgPool, id: DbId, name: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let tags = HashtagRepo::upsert_many(&mut *tx, &[name.to_string()]).await?;
        let Some(tag) = tags.into_iter().next() else {
            return Err(sqlx::Error::RowNotFound);
        };

        let result = sqlx::query(
            "INSERT INTO diary_hashtags (diary_id, hashtag_id, position)
             VALUES ($1, $2,
                 COALESCE((SELECT MAX(position) + 1 FROM diary_hashtags WHERE diary_id = $1), 0))
             ON CONFLICT (diary_id, hashtag_id) DO NOTHING",
        )
        .bind(id)
        .bind(tag.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Detach one hashtag by name. Returns `true` if a link was removed.
    pub async fn remove_hashtag(pool: &PgPool, id: DbId, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM diary_hashtags dh
             USING hashtags h
             WHERE dh.hashtag_id = h.id AND dh.diary_id = $1 AND h.name = $2",
        )
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_thumbnail(
        pool: &PgPool,
        id: DbId,
        thumbnail_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE diaries SET thumbnail_url = $2 WHERE id = $1")
            .bind(id)
            .bind(thumbnail_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a diary. Hashtag links cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM diaries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every diary of a member. Returns the number of rows removed.
    pub async fn delete_by_member(pool: &PgPool, member_id: MemberId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM diaries WHERE member_id = $1")
            .bind(member_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
