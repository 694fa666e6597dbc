//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on:
//! - Reasonable UX limits for names, notes, descriptions
//! - SQLite TEXT has no built-in length enforcement

use crate::utils::AppError;
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, store, promo code, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, order messages
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, payment reference, color codes, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Checkout contact fields ─────────────────────────────────────────

/// Email shape check; real verification happens via the confirmation
/// email, this only rejects obvious typos.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "Email", MAX_EMAIL_LEN)?;
    if !value.validate_email() {
        return Err(AppError::validation(format!("Invalid email: {value}")));
    }
    Ok(())
}

/// Phone numbers keep whatever formatting the customer typed; require at
/// least 6 digits and only phone-ish characters.
pub fn validate_phone(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "Phone", MAX_SHORT_TEXT_LEN)?;
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 6 {
        return Err(AppError::validation(format!("Invalid phone number: {value}")));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(AppError::validation(format!("Invalid phone number: {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Apples", "Name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("", "Name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "Name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "Name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "Notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("fine".into()), "Notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "Notes", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("jo@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+61 8 8123 4567").is_ok());
        assert!(validate_phone("(08) 8123-4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me maybe").is_err());
    }
}
