//! Member entity model and DTOs.

use chrono::NaiveDate;
use fourtoon_core::member::is_admin;
use fourtoon_core::types::{MemberId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub email: Option<String>,
    pub name: Option<String>,
    pub birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Member {
    /// A member counts as signed up once a non-empty name is stored.
    pub fn is_signed_up(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    pub fn is_admin(&self) -> bool {
        is_admin(&self.role)
    }
}

/// DTO for creating a member. The id comes from the identity token.
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub id: MemberId,
    pub email: Option<String>,
    pub name: String,
    pub birth: NaiveDate,
    pub gender: String,
}

/// DTO for updating a member profile. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub birth: Option<NaiveDate>,
    pub gender: Option<String>,
}
