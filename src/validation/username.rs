use crate::error::ValidationError;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Longest accepted username, in characters (RFC 5321 local-part limit).
pub const MAX_USERNAME_LEN: usize = 64;

/// Checks the username against the format rules, first failing rule wins:
///
/// 1. not empty
/// 2. at most 64 characters
/// 3. does not start or end with `.`
/// 4. no `..`
/// 5. only letters, decimal digits, `_`, `-` and `.` (any script)
///
/// The domain is ignored.
///
/// # Examples
/// ```
/// use mailsift::ValidationError;
/// use mailsift::validation::username::validate_username_format;
///
/// assert!(validate_username_format("jane.doe", "example.com").is_ok());
/// assert_eq!(
///     validate_username_format("na..me", "example.com"),
///     Err(ValidationError::ConsecutiveDots)
/// );
/// ```
pub fn validate_username_format(username: &str, _domain: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong);
    }
    if username.starts_with('.') || username.ends_with('.') {
        return Err(ValidationError::UsernameEdgeDot);
    }
    if username.contains("..") {
        return Err(ValidationError::ConsecutiveDots);
    }
    if let Some(c) = username.chars().find(|&c| !is_allowed_username_char(c)) {
        return Err(ValidationError::InvalidUsernameChar(c));
    }
    Ok(())
}

/// Letters (`L*` categories), decimal digits (`Nd`) and `_`, `.`, `-`.
/// Other numbers (`½`, `²`, `Ⅲ`) and combining marks are rejected.
fn is_allowed_username_char(c: char) -> bool {
    if matches!(c, '_' | '.' | '-') {
        return true;
    }
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}
