/// Input validators for login principals
///
/// The principal identifier is forwarded to the credential service and
/// embedded in tokens, so it is bounded and stripped of control characters.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_USERNAME_LENGTH: usize = 256;

lazy_static! {
    static ref CONTROL_CHARACTERS: Regex = Regex::new(r"\p{Cc}").unwrap();
}

/// Validates a login principal and returns it trimmed
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username"));
    }

    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong("username", MAX_USERNAME_LENGTH));
    }

    if CONTROL_CHARACTERS.is_match(trimmed) {
        return Err(ValidationError::SuspiciousContent("username"));
    }

    Ok(trimmed.to_string())
}
