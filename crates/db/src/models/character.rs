//! Character entity model and DTOs.

use fourtoon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A character row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub payment_type: String,
    pub artwork_id: DbId,
    pub selection_thumbnail_url: String,
    /// Style prefix prepended to every panel prompt.
    pub base_prompt: String,
    /// Discord channel serving this character; `None` uses the default channel.
    pub discord_channel_id: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacter {
    pub name: String,
    /// Defaults to `FREE` if omitted.
    pub payment_type: Option<String>,
    pub artwork_id: DbId,
    pub selection_thumbnail_url: String,
    pub base_prompt: Option<String>,
    pub discord_channel_id: Option<i64>,
}

/// DTO for updating an existing character. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub payment_type: Option<String>,
    pub artwork_id: Option<DbId>,
    pub selection_thumbnail_url: Option<String>,
    pub base_prompt: Option<String>,
    pub discord_channel_id: Option<i64>,
}
