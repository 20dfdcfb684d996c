//! Diary content rules, hashtag normalization and panel image keys.

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Every diary is illustrated by a four-panel comic.
pub const PANEL_COUNT: i16 = 4;

/// Maximum diary content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Maximum number of hashtags attached to a single diary.
pub const MAX_HASHTAGS_PER_DIARY: usize = 10;

/// Maximum hashtag length in characters (without the leading `#`).
pub const MAX_HASHTAG_LENGTH: usize = 30;

/// Content type of every stored panel image.
pub const PANEL_CONTENT_TYPE: &str = "image/png";

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// Validate a 1-based panel grid position.
pub fn validate_grid_position(grid_position: i16) -> Result<(), CoreError> {
    if (1..=PANEL_COUNT).contains(&grid_position) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "grid position must be between 1 and {PANEL_COUNT}, got {grid_position}"
        )))
    }
}

/// Object storage key of one panel image: `{diary_id}/{grid_position}.png`.
pub fn image_key(diary_id: DbId, grid_position: i16) -> String {
    format!("{diary_id}/{grid_position}.png")
}

/// Key pattern covering every panel of one diary, for signed cookies.
pub fn image_key_prefix_pattern(diary_id: DbId) -> String {
    format!("{diary_id}/*")
}

/// All grid positions in display order.
pub fn grid_positions() -> impl Iterator<Item = i16> {
    1..=PANEL_COUNT
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Validate diary content: non-blank and at most [`MAX_CONTENT_LENGTH`] chars.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("content must not be blank".into()));
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "content must be at most {MAX_CONTENT_LENGTH} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validate the number of panel scenes submitted for artwork generation.
pub fn validate_scene_count(count: usize) -> Result<(), CoreError> {
    if count == 0 || count > PANEL_COUNT as usize {
        return Err(CoreError::Validation(format!(
            "between 1 and {PANEL_COUNT} scenes are required, got {count}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Hashtags
// ---------------------------------------------------------------------------

/// Normalize a single hashtag: trim and strip leading `#` characters.
///
/// Returns `None` for tags that are blank after normalization.
pub fn normalize_hashtag(raw: &str) -> Option<String> {
    let name = raw.trim().trim_start_matches('#').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Normalize a hashtag list for storage.
///
/// Blank entries are dropped and duplicates removed while keeping the first
/// occurrence's position. Fails if any tag is too long or if more than
/// [`MAX_HASHTAGS_PER_DIARY`] distinct tags remain.
pub fn normalize_hashtags<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, CoreError> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let Some(name) = normalize_hashtag(tag.as_ref()) else {
            continue;
        };
        if name.chars().count() > MAX_HASHTAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "hashtag '{name}' exceeds {MAX_HASHTAG_LENGTH} characters"
            )));
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if names.len() > MAX_HASHTAGS_PER_DIARY {
        return Err(CoreError::Validation(format!(
            "at most {MAX_HASHTAGS_PER_DIARY} hashtags are allowed, got {}",
            names.len()
        )));
    }
    Ok(names)
}
