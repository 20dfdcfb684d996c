//! Repository for the `hashtags` and `diary_hashtags` tables.

use std::collections::HashMap;

use fourtoon_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::hashtag::Hashtag;

const COLUMNS: &str = "id, name, created_at";

/// Hashtags are shared across diaries; links carry the display position.
pub struct HashtagRepo;

impl HashtagRepo {
    /// Insert every name that does not exist yet and return all matching rows.
    ///
    /// Row order is unspecified.
    pub async fn upsert_many(
        conn: &mut PgConnection,
        names: &[String],
    ) -> Result<Vec<Hashtag>, sqlx::Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "INSERT INTO hashtags (name)
             SELECT * FROM UNNEST($1::text[])
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hashtag>(&query)
            .bind(names)
            .fetch_all(conn)
            .await
    }

    /// Replace the hashtag links of one diary with `names`, in order.
    pub async fn replace_links(
        conn: &mut PgConnection,
        diary_id: DbId,
        names: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM diary_hashtags WHERE diary_id = $1")
            .bind(diary_id)
            .execute(&mut *conn)
            .await?;

        if names.is_empty() {
            return Ok(());
        }

        Self::upsert_many(&mut *conn, names).await?;

        sqlx::query(
            "INSERT INTO diary_hashtags (diary_id, hashtag_id, position)
             SELECT $1, h.id, (t.ord - 1)::smallint
             FROM UNNEST($2::text[]) WITH ORDINALITY AS t(name, ord)
             JOIN hashtags h ON h.name = t.name",
        )
        .bind(diary_id)
        .bind(names)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Hashtag names of one diary in display order.
    pub async fn list_for_diary(pool: &PgPool, diary_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT h.name
             FROM diary_hashtags dh
             JOIN hashtags h ON h.id = dh.hashtag_id
             WHERE dh.diary_id = $1
             ORDER BY dh.position ASC, h.name ASC",
        )
        .bind(diary_id)
        .fetch_all(pool)
        .await
    }

    /// Hashtag names for several diaries at once, keyed by diary id.
    pub async fn list_for_diaries(
        pool: &PgPool,
        diary_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<String>>, sqlx::Error> {
        let mut grouped: HashMap<DbId, Vec<String>> = HashMap::new();
        if diary_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = sqlx::query_as::<_, (DbId, String)>(
            "SELECT dh.diary_id, h.name
             FROM diary_hashtags dh
             JOIN hashtags h ON h.id = dh.hashtag_id
             WHERE dh.diary_id = ANY($1)
             ORDER BY dh.diary_id, dh.position ASC, h.name ASC",
        )
        .bind(diary_ids)
        .fetch_all(pool)
        .await?;

        for (diary_id, name) in rows {
            grouped.entry(diary_id).or_default().push(name);
        }
        Ok(grouped)
    }
}
