//! Repository for the `members` table.

use fourtoon_core::member::ROLE_MEMBER;
use fourtoon_core::types::{MemberId, Timestamp};
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member, UpdateMember};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, email, name, birth, gender, role, deleted_at, created_at, updated_at";

/// Provides CRUD operations for members, including soft and hard delete.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a new member with the default `MEMBER` role.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (id, email, name, birth, gender, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(input.id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(input.birth)
            .bind(&input.gender)
            .bind(ROLE_MEMBER)
            .fetch_one(pool)
            .await
    }

    /// Find a member by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: MemberId) -> Result<Option<Member>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM members WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether any row exists for `id`, soft-deleted rows included.
    pub async fn exists(pool: &PgPool, id: MemberId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update a member profile. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active member with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: MemberId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET
                name = COALESCE($2, name),
                birth = COALESCE($3, birth),
                gender = COALESCE($4, gender)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.birth)
            .bind(&input.gender)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a member at `at`. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        id: MemberId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE members SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a member and every diary they wrote.
    ///
    /// Diaries go first so hashtag links cascade from them, then the member
    /// row; both statements share one transaction. Returns `true` if the
    /// member row was removed.
    pub async fn hard_delete_with_diaries(pool: &PgPool, id: MemberId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let diaries = sqlx::query("DELETE FROM diaries WHERE member_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            member_id = %id,
            diaries_deleted = diaries.rows_affected(),
            "Hard-deleted member"
        );
        Ok(result.rows_affected() > 0)
    }
}
