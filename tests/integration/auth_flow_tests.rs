// ===================================
// tests/integration/auth_flow_tests.rs
// ===================================
use std::sync::Arc;

use chrono::Duration;
use pharmacy_auth::auth::{is_canonical, AuthService};
use pharmacy_auth::directory::AccountDirectory;
use pharmacy_auth::error::AppError;
use pharmacy_common::{Admin, Role};

use crate::test_utils::{setup_auth, setup_seeded_auth};

#[test]
fn test_admin_lockout_scenario() {
    let (auth, clock) = setup_seeded_auth();

    for _ in 0..4 {
        assert!(auth.authenticate_admin("admin", "wrong").is_none());
        assert!(!auth.is_locked("admin"));
    }

    assert!(auth.authenticate_admin("admin", "wrong").is_none());
    assert!(auth.is_locked("admin"));

    // correct password while locked
    assert!(auth.authenticate_admin("admin", "admin123").is_none());
    assert_eq!(auth.directory().admins.find_by_id(1).unwrap().read().password, "admin123");

    clock.advance(Duration::minutes(15) + Duration::seconds(1));

    let admin = auth.authenticate_admin("admin", "admin123").expect("lockout should have expired");
    assert!(is_canonical(&admin.read().password));
    assert!(!auth.is_locked("admin"));
}

#[test]
fn test_lazy_migration_rewrites_in_repository() {
    let directory = AccountDirectory::new();
    directory.admins.insert(Admin::new(7, "keeper", "abc123")).unwrap();
    let (auth, _clock) = setup_auth(directory);

    assert!(auth.authenticate_admin("keeper", "abc123").is_some());

    let stored = auth.directory().admins.find_by_id(7).unwrap().read().password.clone();
    assert_ne!(stored, "abc123");
    assert!(stored.starts_with("$SHA$"));
    assert_eq!(stored.matches('$').count(), 4);

    assert!(auth.authenticate_admin("keeper", "abc123").is_some());
    assert!(auth.authenticate_admin("keeper", "abc124").is_none());
}

#[test]
fn test_unknown_username_is_throttled_like_real_one() {
    let (auth, _clock) = setup_seeded_auth();

    for _ in 0..5 {
        assert!(auth.authenticate_doctor("nobody", "guess").is_none());
    }
    for _ in 0..5 {
        assert!(auth.authenticate_doctor("drhouse", "guess").is_none());
    }

    assert!(auth.is_locked("nobody"));
    assert!(auth.is_locked("drhouse"));
    assert_eq!(
        auth.authenticator().tracker().state("nobody"),
        auth.authenticator().tracker().state("drhouse")
    );
}

#[test]
fn test_validation_failures_never_count() {
    let (auth, _clock) = setup_seeded_auth();

    for _ in 0..20 {
        assert!(auth.authenticate_admin("", "admin123").is_none());
        assert!(auth.authenticate_admin("admin", "").is_none());
        assert!(auth.authenticate_admin("admin'", "admin123").is_none());
    }

    assert!(!auth.is_locked("admin"));
    assert!(!auth.is_locked("admin'"));
    assert_eq!(auth.authenticator().tracker().tracked(), 0);
    assert!(auth.authenticate_admin("admin", "admin123").is_some());
}

#[test]
fn test_patient_lookup_ignores_case() {
    let (auth, _clock) = setup_seeded_auth();

    let patient = auth.authenticate_patient("alice", "alicepw").expect("patient match ignores case");
    assert_eq!(patient.read().id, 10);
    assert!(auth.authenticate_patient("ALICE", "alicepw").is_some());
}

#[test]
fn test_other_roles_match_case_exactly() {
    let (auth, _clock) = setup_seeded_auth();

    assert!(auth.authenticate_admin("Admin", "admin123").is_none());
    assert!(auth.authenticate_doctor("DrHouse", "vicodin").is_none());
    assert!(auth.authenticate_pharmacist("PHARMA", "pills4u").is_none());

    assert!(auth.authenticate_admin("admin", "admin123").is_some());
    assert!(auth.authenticate_doctor("drhouse", "vicodin").is_some());
    assert!(auth.authenticate_pharmacist("pharma", "pills4u").is_some());
}

#[test]
fn test_lockout_keyed_by_typed_username_for_patients() {
    let (auth, _clock) = setup_seeded_auth();

    for _ in 0..5 {
        auth.authenticate_patient("ALICE", "nope");
    }

    assert!(auth.is_locked("ALICE"));
    assert!(auth.authenticate_patient("ALICE", "alicepw").is_none());
    assert!(auth.authenticate_patient("alice", "alicepw").is_some());
}

#[test]
fn test_roles_do_not_share_accounts() {
    let (auth, _clock) = setup_seeded_auth();
    assert!(auth.authenticate_doctor("admin", "admin123").is_none());
    assert!(auth.authenticate_pharmacist("drhouse", "vicodin").is_none());
}

#[test]
fn test_success_resets_failure_count() {
    let (auth, _clock) = setup_seeded_auth();

    for _ in 0..4 {
        auth.authenticate_pharmacist("pharma", "bad");
    }
    assert!(auth.authenticate_pharmacist("pharma", "pills4u").is_some());

    for _ in 0..4 {
        auth.authenticate_pharmacist("pharma", "bad");
    }
    assert!(!auth.is_locked("pharma"));
}

#[test]
fn test_login_explains_rejections() {
    let (auth, clock) = setup_seeded_auth();

    assert!(matches!(
        auth.login(Role::Admin, "", "x"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        auth.login(Role::Admin, "admin", "bad"),
        Err(AppError::InvalidCredentials { remaining_attempts: 4 })
    ));

    for _ in 0..3 {
        let _ = auth.login(Role::Admin, "admin", "bad");
    }
    assert!(matches!(
        auth.login(Role::Admin, "admin", "bad"),
        Err(AppError::AuthRateLimited { retry_after_secs: 900 })
    ));

    clock.advance(Duration::minutes(20));
    let user = auth.login(Role::Admin, "admin", "admin123").unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.username, "admin");
}

#[test]
fn test_migrated_credential_shared_with_all_handles() {
    let (auth, _clock) = setup_seeded_auth();
    let held = auth.directory().doctors.find_by_id(20).unwrap();

    let returned = auth.authenticate_doctor("drhouse", "vicodin").unwrap();

    assert!(Arc::ptr_eq(&held, &returned));
    assert!(is_canonical(&held.read().password));
}
