use fourtoon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `hashtags` table. Names are unique.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hashtag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
