/// Serial primary keys (artworks, characters, diaries, hashtags).
pub type DbId = i64;

/// Members are keyed by the subject UUID of their identity token.
pub type MemberId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
