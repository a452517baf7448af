//! Field validation rules for user records.
//!
//! Stateless boolean predicates over raw candidate values. Callers
//! decide the error kind; the rule strings below are shared between
//! service errors and shell re-prompts so both show identical wording.

use once_cell::sync::Lazy;
use regex::Regex;

/// User-facing rule for the name field.
pub const NAME_RULE: &str = "name must contain only letters, spaces or hyphens and be 2 to 50 characters";
/// User-facing rule for the email field.
pub const EMAIL_RULE: &str = "invalid email format";
/// User-facing rule for the age field.
pub const AGE_RULE: &str = "age must be between 1 and 120";

/// Latin or Cyrillic letters, whitespace and hyphens, 2 to 50 characters.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zА-Яа-яЁё\s-]{2,50}$").expect("valid name pattern"));

/// Loose RFC shape: local part, dotted domain, alphabetic suffix of 2+.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Check a candidate name: pattern match plus a trimmed length of at
/// least 2, so whitespace padding cannot satisfy the minimum.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name) && name.trim().chars().count() >= 2
}

/// Check a candidate email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Check a candidate age.
pub fn is_valid_age(age: i32) -> bool {
    (1..=120).contains(&age)
}
