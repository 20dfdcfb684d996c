//! Repository for the `artworks` table.

use fourtoon_core::types::DbId;
use sqlx::PgPool;

use crate::models::artwork::{Artwork, CreateArtwork};

const COLUMNS: &str = "id, title, thumbnail_url, created_at, updated_at";

pub struct ArtworkRepo;

impl ArtworkRepo {
    pub async fn create(pool: &PgPool, input: &CreateArtwork) -> Result<Artwork, sqlx::Error> {
        let query = format!(
            "INSERT INTO artworks (title, thumbnail_url)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artwork>(&query)
            .bind(&input.title)
            .bind(&input.thumbnail_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Artwork>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artworks WHERE id = $1");
        sqlx::query_as::<_, Artwork>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all artworks, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Artwork>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artworks ORDER BY id ASC");
        sqlx::query_as::<_, Artwork>(&query).fetch_all(pool).await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM artworks WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete an artwork. Fails with a foreign-key violation while any
    /// character still uses it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
