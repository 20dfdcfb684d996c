//! Repository for the `characters` table.

use fourtoon_core::character::PAYMENT_FREE;
use fourtoon_core::types::DbId;
use sqlx::PgPool;

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, payment_type, artwork_id, selection_thumbnail_url, \
                       base_prompt, discord_channel_id, created_at, updated_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    ///
    /// If `payment_type` is `None`, defaults to `FREE`.
    /// If `base_prompt` is `None`, defaults to the empty string.
    pub async fn create(pool: &PgPool, input: &CreateCharacter) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters
                (name, payment_type, artwork_id, selection_thumbnail_url, base_prompt, discord_channel_id)
             VALUES ($1, COALESCE($2, $7), $3, $4, COALESCE($5, ''), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(&input.name)
            .bind(&input.payment_type)
            .bind(input.artwork_id)
            .bind(&input.selection_thumbnail_url)
            .bind(&input.base_prompt)
            .bind(input.discord_channel_id)
            .bind(PAYMENT_FREE)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all characters in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters ORDER BY id ASC");
        sqlx::query_as::<_, Character>(&query).fetch_all(pool).await
    }

    /// Update a character. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = COALESCE($2, name),
                payment_type = COALESCE($3, payment_type),
                artwork_id = COALESCE($4, artwork_id),
                selection_thumbnail_url = COALESCE($5, selection_thumbnail_url),
                base_prompt = COALESCE($6, base_prompt),
                discord_channel_id = COALESCE($7, discord_channel_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.payment_type)
            .bind(input.artwork_id)
            .bind(&input.selection_thumbnail_url)
            .bind(&input.base_prompt)
            .bind(input.discord_channel_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a character. Returns `true` if a row was removed.
    ///
    /// Characters referenced by diaries cannot be deleted; the foreign key
    /// rejects the statement.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
