pub mod artwork;
pub mod character;
pub mod diary;
pub mod diary_image;
pub mod member;
