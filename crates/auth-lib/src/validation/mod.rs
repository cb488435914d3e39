// ============================
// crates/auth-lib/src/validation/mod.rs
// ============================
//! Login input validation.
//!
//! Runs before any account lookup or lockout bookkeeping. A rejected pair is
//! not counted as a guessing attempt.

use thiserror::Error;

/// Shortest accepted username, after trimming.
///
/// The rejection message says 3; the enforced bound is 2. Both are kept as
/// they are until the intended bound is decided.
pub const MIN_USERNAME_LENGTH: usize = 2;

/// Substrings refused in usernames
pub const UNSAFE_USERNAME_PATTERNS: [&str; 5] = [";", "'", "\"", "`", "--"];

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Username contains invalid characters")]
    UnsafeCharacters,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a username/password pair submitted for login
pub fn validate_credentials(username: &str, password: &str) -> ValidationResult<()> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }

    if password.trim().is_empty() {
        return Err(ValidationError::EmptyPassword);
    }

    if trimmed.chars().count() < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }

    if contains_unsafe_characters(username) {
        return Err(ValidationError::UnsafeCharacters);
    }

    Ok(())
}

/// Check a username against the denylist
pub fn contains_unsafe_characters(username: &str) -> bool {
    UNSAFE_USERNAME_PATTERNS
        .iter()
        .any(|pattern| username.contains(pattern))
}
