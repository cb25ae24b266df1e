use crate::error::{AppError, AppResult};
use regex::Regex;

/// Basic shape check; full RFC validation is not attempted.
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    if !email_regex.is_match(email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}
