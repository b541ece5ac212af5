//! Validation helpers used by `#[validate(custom(...))]` attributes on request DTOs.

use std::borrow::Cow;

use validator::ValidationError;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 20;
pub const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&";

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Password policy: 8-20 characters drawn from letters, digits and `@$!%*?&`,
/// with at least one lowercase, one uppercase, one digit and one special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LENGTH {
        return Err(error(
            "password_too_short",
            "Password too short, it should be a minimum of 8 characters",
        ));
    }
    if len > PASSWORD_MAX_LENGTH {
        return Err(error(
            "password_too_long",
            "Password too long, it should be a maximum of 20 characters",
        ));
    }

    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIAL_CHARS.contains(c));
    let strong = allowed
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));
    if !strong {
        return Err(error("password_too_weak", "Password too weak"));
    }
    Ok(())
}

/// Digits with optional leading `+`, spaces, dashes and parentheses; 6-20 characters.
pub fn validate_contact_number(value: &str) -> Result<(), ValidationError> {
    let body = value.strip_prefix('+').unwrap_or(value);
    let len = value.chars().count();
    let well_formed = (6..=20).contains(&len)
        && body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-'));
    if well_formed {
        Ok(())
    } else {
        Err(error("contact_number", "Contact number is not valid"))
    }
}

/// Rejects strings that are empty once whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}
