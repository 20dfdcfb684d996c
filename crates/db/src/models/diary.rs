//! Diary entity model and DTOs.

use chrono::NaiveDate;
use fourtoon_core::types::{DbId, MemberId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A diary row from the `diaries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Diary {
    pub id: DbId,
    pub member_id: MemberId,
    pub character_id: DbId,
    pub content: String,
    pub thumbnail_url: Option<String>,
    pub diary_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A diary together with its hashtag names in display order.
#[derive(Debug, Clone, Serialize)]
pub struct DiaryDetail {
    #[serde(flatten)]
    pub diary: Diary,
    pub hashtags: Vec<String>,
}

/// DTO for creating a diary. The owning member comes from the caller's token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiary {
    pub character_id: DbId,
    pub content: String,
    pub diary_date: NaiveDate,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// DTO for updating a diary. `hashtags`, when present, replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDiary {
    pub character_id: Option<DbId>,
    pub content: Option<String>,
    pub hashtags: Option<Vec<String>>,
}
