// ============================
// tests/unit/password_tests.rs
// ============================
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pharmacy_auth::auth::{hash_password, is_canonical, verify_password, PasswordHasher, CREDENTIAL_TAG};

#[test]
fn test_password_hashing_and_verification() {
    let hasher = PasswordHasher::new().unwrap();
    let long = "x".repeat(200);

    for password in ["admin123", "p", "with space", "ünïcødé-密码", long.as_str()] {
        let stored = hasher.hash(password).unwrap();

        assert_ne!(stored, password);
        assert!(hasher.verify(password, &stored), "{password:?} should verify");
        assert!(!hasher.verify(&format!("{password}!"), &stored));
    }
}

#[test]
fn test_salts_differ_between_hashes() {
    let first = hash_password("abc123").unwrap();
    let second = hash_password("abc123").unwrap();

    assert_ne!(first, second);
    assert!(verify_password("abc123", &first));
    assert!(verify_password("abc123", &second));

    let salt = |s: &str| s[CREDENTIAL_TAG.len()..].split('$').next().unwrap().to_string();
    assert_ne!(salt(&first), salt(&second));
}

#[test]
fn test_stored_format_is_tag_salt_digest() {
    let stored = hash_password("abc123").unwrap();
    assert!(stored.starts_with("$SHA$"));

    let fields: Vec<&str> = stored.trim_start_matches("$SHA$").split('$').collect();
    assert_eq!(fields.len(), 2);
    assert_eq!(STANDARD.decode(fields[0]).unwrap().len(), 16);
    assert_eq!(STANDARD.decode(fields[1]).unwrap().len(), 32);
}

#[test]
fn test_plaintext_is_not_canonical() {
    assert!(!is_canonical("abc123"));
    assert!(!verify_password("abc123", "abc123"));
}

#[test]
fn test_decode_errors_are_verification_failures() {
    assert!(!verify_password("pw", "$SHA$not base64$also not"));
    assert!(!verify_password("pw", "$SHA$AAAAAAAAAAAAAAAAAAAAAA==$"));
    assert!(!verify_password("", ""));
}
