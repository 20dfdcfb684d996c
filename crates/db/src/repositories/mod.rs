//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-statement writes
//! open their own transaction.

pub mod artwork_repo;
pub mod character_repo;
pub mod diary_repo;
pub mod hashtag_repo;
pub mod member_repo;

pub use artwork_repo::ArtworkRepo;
pub use character_repo::CharacterRepo;
pub use diary_repo::DiaryRepo;
pub use hashtag_repo::HashtagRepo;
pub use member_repo::MemberRepo;
