//! Input validation kernel.
//!
//! Pure functions with no I/O. Every validator returns the normalized value
//! on success and a [`CoreError::InvalidInput`] naming the offending field on
//! failure. Callers report these errors; they never swallow them.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

pub const USERNAME_MIN_LEN: usize = 5;
pub const USERNAME_MAX_LEN: usize = 10;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 25;
pub const EMAIL_MAX_LEN: usize = 254;
pub const NICKNAME_MAX_LEN: usize = 20;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

/// Require a non-empty string after trimming; returns the trimmed value.
pub fn validate_string(raw: &str, field: &str) -> CoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(
            field,
            "can not be empty or just whitespace",
        ));
    }
    Ok(trimmed.to_string())
}

/// Require a strictly positive integer.
pub fn validate_positive_integer(value: i64, field: &str) -> CoreResult<i64> {
    if value <= 0 {
        return Err(CoreError::invalid(field, "must be a positive integer"));
    }
    Ok(value)
}

/// Require a finite, strictly positive number.
pub fn validate_positive_number(value: f64, field: &str) -> CoreResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::invalid(field, "must be a finite positive number"));
    }
    Ok(value)
}

/// Parse a well-formed opaque identifier.
pub fn validate_id(raw: &str, field: &str) -> CoreResult<Uuid> {
    let trimmed = validate_string(raw, field)?;
    Uuid::parse_str(&trimmed).map_err(|_| CoreError::invalid(field, "is not a valid id"))
}

/// Usernames are 5-10 ASCII alphanumeric characters. Returned lower-cased.
pub fn validate_username(raw: &str) -> CoreResult<String> {
    let username = validate_string(raw, "Username")?;
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(CoreError::invalid(
            "Username",
            format!("must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters long"),
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::invalid(
            "Username",
            "may only contain letters and digits",
        ));
    }
    Ok(username.to_lowercase())
}

/// Emails must look like `local@domain.tld` and fit in 254 characters.
/// Returned lower-cased.
pub fn validate_email(raw: &str) -> CoreResult<String> {
    let email = validate_string(raw, "Email")?;
    if email.len() > EMAIL_MAX_LEN {
        return Err(CoreError::invalid(
            "Email",
            format!("must be at most {EMAIL_MAX_LEN} characters long"),
        ));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(CoreError::invalid("Email", "is not a valid email address"));
    }
    Ok(email.to_lowercase())
}

/// Passwords are 8-25 characters with no whitespace, at least one uppercase
/// letter, one digit, and one symbol. Returned unchanged (never trimmed).
pub fn validate_password(raw: &str) -> CoreResult<String> {
    let len = raw.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(CoreError::invalid(
            "Password",
            format!("must be {PASSWORD_MIN_LEN}-{PASSWORD_MAX_LEN} characters long"),
        ));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(CoreError::invalid("Password", "can not contain spaces"));
    }
    if !raw.chars().any(|c| c.is_uppercase()) {
        return Err(CoreError::invalid(
            "Password",
            "must contain at least one uppercase letter",
        ));
    }
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err(CoreError::invalid(
            "Password",
            "must contain at least one number",
        ));
    }
    if !raw.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        return Err(CoreError::invalid(
            "Password",
            "must contain at least one special character",
        ));
    }
    Ok(raw.to_string())
}

/// Nicknames are trimmed and at most 20 characters.
pub fn validate_nickname(raw: &str) -> CoreResult<String> {
    let nickname = validate_string(raw, "Nickname")?;
    if nickname.chars().count() > NICKNAME_MAX_LEN {
        return Err(CoreError::invalid(
            "Nickname",
            format!("must be at most {NICKNAME_MAX_LEN} characters long"),
        ));
    }
    Ok(nickname)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn string_is_trimmed() {
        assert_eq!(validate_string("  koromon ", "Name").unwrap(), "koromon");
    }

    #[test]
    fn blank_string_names_the_field() {
        let err = validate_string("   ", "Description").unwrap_err();
        assert_matches!(err, CoreError::InvalidInput(msg) if msg.starts_with("Description"));
    }

    #[test]
    fn positive_integer_bounds() {
        assert!(validate_positive_integer(1, "Count").is_ok());
        assert!(validate_positive_integer(0, "Count").is_err());
        assert!(validate_positive_integer(-5, "Count").is_err());
    }

    #[test]
    fn positive_number_rejects_nan_and_infinity() {
        assert!(validate_positive_number(0.5, "Pull rate").is_ok());
        assert!(validate_positive_number(0.0, "Pull rate").is_err());
        assert!(validate_positive_number(f64::NAN, "Pull rate").is_err());
        assert!(validate_positive_number(f64::INFINITY, "Pull rate").is_err());
    }

    #[test]
    fn id_must_parse() {
        let id = Uuid::now_v7();
        assert_eq!(validate_id(&id.to_string(), "User ID").unwrap(), id);
        assert_matches!(
            validate_id("not-an-id", "User ID"),
            Err(CoreError::InvalidInput(msg)) if msg.contains("User ID")
        );
    }

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("Player1").unwrap(), "player1");
        assert!(validate_username("abcd").is_err(), "too short");
        assert!(validate_username("abcdefghijk").is_err(), "too long");
        assert!(validate_username("play_er").is_err(), "underscore");
    }

    #[test]
    fn email_rules() {
        assert_eq!(
            validate_email("Someone@Example.com").unwrap(),
            "someone@example.com"
        );
        assert!(validate_email("someone@").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("Secret1!").is_ok());
        assert!(validate_password("Sec1!").is_err(), "too short");
        assert!(validate_password("Secret1!Secret1!Secret1!xx").is_err(), "too long");
        assert!(validate_password("Secret 1!").is_err(), "space");
        assert!(validate_password("secret1!").is_err(), "no uppercase");
        assert!(validate_password("Secretxx!").is_err(), "no digit");
        assert!(validate_password("Secret12").is_err(), "no symbol");
    }

    #[test]
    fn nickname_length() {
        assert_eq!(validate_nickname(" Bubbles ").unwrap(), "Bubbles");
        assert!(validate_nickname(&"x".repeat(20)).is_ok());
        assert!(validate_nickname(&"x".repeat(21)).is_err());
    }
}
