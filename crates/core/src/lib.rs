//! Domain types, constants and validation shared by every fourtoon crate.
//!
//! Nothing in here touches the database, the network or the clock; the
//! helpers are pure so the API, the repositories and the Midjourney bridge
//! can all apply the same rules.

pub mod character;
pub mod diary;
pub mod error;
pub mod member;
pub mod pagination;
pub mod types;
