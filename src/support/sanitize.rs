use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SurveyError};

static VALIDATE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^@\s<>"'`\p{Cc}]+@[^@\s<>"'`\p{Cc}]+\.[^@\s<>"'`\p{Cc}]+$"#).unwrap()
});

const PASSWORD_SPECIALS: &str = "@$!%*?&";
const PASSWORD_MIN_LEN: usize = 8;
pub const EMAIL_MAX_LEN: usize = 100;

/// Escapes the characters that can open a tag or an entity. Quotes are kept so stored text
/// reads the same in CSV and plain-text output.
pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trims `s`; whitespace-only input becomes `None`.
pub fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Rejects text longer than `max` characters. Length is checked before escaping.
pub fn check_len(field: &'static str, s: &str, max: usize) -> Result<()> {
    let len = s.chars().count();
    if len > max {
        return Err(SurveyError::validation(field, format!("must be at most {} characters; got {}", max, len)));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    email.chars().count() <= EMAIL_MAX_LEN && VALIDATE_EMAIL.is_match(email)
}

/// Trims and validates an email address.
pub fn clean_email(field: &'static str, email: &str) -> Result<String> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(SurveyError::validation(field, format!("'{}' is not a valid email address", email)));
    }
    Ok(email.to_owned())
}

/// Password policy: at least 8 characters drawn from ASCII letters, digits and `@$!%*?&`, with
/// at least one of each class.
pub fn check_password(password: &str) -> Result<()> {
    let allowed = password.chars().all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    if !allowed {
        return Err(SurveyError::validation(
            "password",
            format!("may only contain letters, numbers, and the characters {}", PASSWORD_SPECIALS),
        ));
    }

    let strong = password.len() >= PASSWORD_MIN_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if !strong {
        return Err(SurveyError::validation(
            "password",
            "must be at least 8 characters long and contain one uppercase letter, one lowercase letter, \
             one number, and one special character",
        ));
    }

    Ok(())
}
