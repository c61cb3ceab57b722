//! Registration input policy.

use crate::error::AuthError;

/// Minimum username length after trimming surrounding whitespace.
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate a registration username. Returns the trimmed form on success.
pub fn validate_username(username: &str) -> Result<&str, AuthError> {
    let trimmed = username.trim();
    if trimmed.chars().count() < MIN_USERNAME_LEN {
        return Err(AuthError::Validation(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a registration password.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
