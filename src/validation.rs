//! Input validation for the service layer.
//!
//! Every check returns [`Error::Validation`] naming the offending field, which
//! the HTTP layer renders as a 400.

use crate::error::{Error, Result, ValidationErrors};

/// Inclusive bounds accepted for a watchlist rating.
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

fn invalid(field: &str, message: impl Into<String>) -> Error {
    Error::Validation(ValidationErrors::single(field, message))
}

/// Validates email format using structural checks
///
/// # Examples
/// ```
/// use movietrack::validation::validate_email;
///
/// validate_email("user@example.com").unwrap();
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(invalid("email", "Email cannot be empty"));
    }

    if email.len() > 254 {
        return Err(invalid("email", "Email address is too long (max 254 characters)"));
    }

    let Some((local_part, domain)) = email.split_once('@') else {
        return Err(invalid("email", "Invalid email format: must contain @ symbol"));
    };

    if domain.contains('@') {
        return Err(invalid("email", "Invalid email format: must contain exactly one @ symbol"));
    }

    if local_part.is_empty() || local_part.len() > 64 {
        return Err(invalid("email", "Invalid email format: local part must be 1-64 characters"));
    }

    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("email", "Invalid email format: domain must contain at least one dot"));
    }

    if email.contains("..") {
        return Err(invalid("email", "Invalid email format: cannot contain consecutive dots"));
    }

    let invalid_chars = ['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', ' '];
    if let Some(c) = email.chars().find(|c| invalid_chars.contains(c)) {
        return Err(invalid("email", format!("Invalid email format: cannot contain '{}'", c)));
    }

    Ok(())
}

/// Validates password length and format
pub fn validate_password(password: &str) -> Result<()> {
    // Length in characters, not bytes
    let length = password.chars().count();

    if length < 8 {
        return Err(invalid("password", "Password must be at least 8 characters long"));
    }

    if length > 128 {
        return Err(invalid("password", "Password is too long (max 128 characters)"));
    }

    Ok(())
}

/// Validates a user's display name
pub fn validate_name(name: &str) -> Result<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(invalid("name", "Name cannot be empty"));
    }

    if name.chars().count() > 100 {
        return Err(invalid("name", "Name must be less than 100 characters"));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(invalid("name", "Name cannot contain control characters"));
    }

    Ok(())
}

/// Longest movie title accepted, in characters. Matches the `title` column.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Validates a movie title
pub fn validate_title(title: &str) -> Result<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(invalid("title", "Title cannot be empty"));
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(invalid(
            "title",
            format!("Title is too long (max {} characters)", MAX_TITLE_LENGTH),
        ));
    }

    Ok(())
}

/// Validates an optional watchlist rating
pub fn validate_rating(rating: Option<i32>) -> Result<()> {
    match rating {
        Some(value) if !RATING_RANGE.contains(&value) => Err(invalid(
            "rating",
            format!(
                "Rating must be between {} and {}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ),
        )),
        _ => Ok(()),
    }
}
