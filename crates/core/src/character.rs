//! Character payment types, name validation and prompt composition.

use crate::error::CoreError;

pub const PAYMENT_FREE: &str = "FREE";
pub const PAYMENT_PAID: &str = "PAID";

const VALID_PAYMENT_TYPES: &[&str] = &[PAYMENT_FREE, PAYMENT_PAID];

/// Maximum character name length in characters.
pub const MAX_CHARACTER_NAME_LENGTH: usize = 50;

/// Validate a character payment type string.
pub fn validate_payment_type(payment_type: &str) -> Result<(), CoreError> {
    if VALID_PAYMENT_TYPES.contains(&payment_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid payment type '{payment_type}'. Must be one of: {VALID_PAYMENT_TYPES:?}"
        )))
    }
}

/// Validate a character name.
pub fn validate_character_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("character name must not be blank".into()));
    }
    if trimmed.chars().count() > MAX_CHARACTER_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "character name must be at most {MAX_CHARACTER_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Build the prompt sent to Midjourney for one panel.
///
/// The character's base prompt carries the persona's visual style and goes
/// first; the panel scene follows. Either side may be empty.
pub fn compose_panel_prompt(base_prompt: &str, scene: &str) -> String {
    let base = base_prompt.trim().trim_end_matches(',').trim_end();
    let scene = scene.trim();
    match (base.is_empty(), scene.is_empty()) {
        (true, _) => scene.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}, {scene}"),
    }
}
