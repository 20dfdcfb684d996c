//! Member roles, genders and profile validation.

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Default role assigned on sign-up.
pub const ROLE_MEMBER: &str = "MEMBER";

/// Operators allowed to manage characters and artworks.
pub const ROLE_ADMIN: &str = "ADMIN";

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

pub const GENDER_MALE: &str = "MALE";
pub const GENDER_FEMALE: &str = "FEMALE";

const VALID_GENDERS: &[&str] = &[GENDER_MALE, GENDER_FEMALE];

/// Maximum display-name length in characters.
pub const MAX_NAME_LENGTH: usize = 30;

/// Earliest accepted birth year.
pub const MIN_BIRTH_YEAR: i32 = 1900;

/// Validate the gender string sent by the client.
pub fn validate_gender(gender: &str) -> Result<(), CoreError> {
    if VALID_GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid gender '{gender}'. Must be one of: {VALID_GENDERS:?}"
        )))
    }
}

/// Validate a member's display name.
///
/// The name is what marks a member as signed up, so blank names are
/// rejected rather than stored.
pub fn validate_member_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be blank".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a birth date against `today`.
pub fn validate_birth(birth: NaiveDate, today: NaiveDate) -> Result<(), CoreError> {
    if birth > today {
        return Err(CoreError::Validation(
            "birth must not be in the future".into(),
        ));
    }
    if birth.year() < MIN_BIRTH_YEAR {
        return Err(CoreError::Validation(format!(
            "birth must not be before {MIN_BIRTH_YEAR}"
        )));
    }
    Ok(())
}

/// Whether `role` grants admin access.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
