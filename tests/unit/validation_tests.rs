// ===============================
// tests/unit/validation_tests.rs
// ===============================
use pharmacy_auth::validation::{validate_credentials, ValidationError, MIN_USERNAME_LENGTH};

#[test]
fn test_rejections_in_order() {
    assert_eq!(validate_credentials("", "pw"), Err(ValidationError::EmptyUsername));
    assert_eq!(validate_credentials("admin", "   "), Err(ValidationError::EmptyPassword));
    assert_eq!(validate_credentials("a", "pw"), Err(ValidationError::UsernameTooShort));
    assert_eq!(validate_credentials("ad;min", "pw"), Err(ValidationError::UnsafeCharacters));
}

#[test]
fn test_too_short_message_disagrees_with_bound() {
    assert_eq!(MIN_USERNAME_LENGTH, 2);
    assert!(validate_credentials("ab", "pw").is_ok());
    assert!(ValidationError::UsernameTooShort.to_string().contains("at least 3"));
}

#[test]
fn test_sql_fragments_rejected() {
    for username in ["admin'--", "x\" OR \"1\"=\"1", "bob; DROP TABLE users", "--"] {
        assert!(validate_credentials(username, "pw").is_err(), "{username}");
    }
}

#[test]
fn test_backtick_in_username_rejected() {
    for username in ["ad`min", "ad``min", "`whoami`"] {
        assert_eq!(
            validate_credentials(username, "pw"),
            Err(ValidationError::UnsafeCharacters),
            "{username}"
        );
    }
}

#[test]
fn test_password_content_is_not_filtered() {
    assert!(validate_credentials("admin", "p'; --\"").is_ok());
}
