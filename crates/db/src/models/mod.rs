//! Row models (`FromRow`) and create/update DTOs, one module per table.

pub mod artwork;
pub mod character;
pub mod diary;
pub mod hashtag;
pub mod member;
