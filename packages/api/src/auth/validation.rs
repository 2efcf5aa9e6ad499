//! Registration input checks.

use once_cell::sync::Lazy;
use regex::Regex;
use store::Gender;

use super::error::AuthError;

/// Something@something.tld, with a TLD of at least two characters.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").unwrap());

pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() {
        return Err(AuthError::validation("Username is required"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(AuthError::validation("Invalid email address"));
    }
    Ok(())
}

/// Length is counted in characters, not bytes.
pub fn validate_password(password: &str, min_len: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_len {
        return Err(AuthError::validation(format!(
            "Password must be at least {min_len} characters"
        )));
    }
    Ok(())
}

pub fn validate_confirmation(password: &str, confirm: &str) -> Result<(), AuthError> {
    if password != confirm {
        return Err(AuthError::validation("Passwords do not match"));
    }
    Ok(())
}

/// Parse a gender coming from a form field.
pub fn parse_gender(value: &str) -> Result<Gender, AuthError> {
    value
        .parse()
        .map_err(|_| AuthError::validation("Invalid gender"))
}
