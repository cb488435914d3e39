// ======================================
// tests/integration/concurrency_tests.rs
// ======================================
use std::thread;

use pharmacy_auth::auth::{verify_password, AuthService};

use crate::test_utils::setup_seeded_auth;

#[test]
fn test_concurrent_failures_stop_at_threshold() {
    let (auth, _clock) = setup_seeded_auth();

    thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| {
                for _ in 0..4 {
                    assert!(auth.authenticate_admin("admin", "wrong").is_none());
                }
            });
        }
    });

    let state = auth.authenticator().tracker().state("admin").unwrap();
    assert_eq!(state.failure_count, 5);
    assert!(state.locked_at.is_some());
}

#[test]
fn test_mixed_guesses_never_exceed_threshold() {
    let (auth, _clock) = setup_seeded_auth();

    thread::scope(|s| {
        for i in 0..8usize {
            let auth = &auth;
            s.spawn(move || {
                for j in 0..10usize {
                    let password = if (i + j) % 7 == 0 { "admin123" } else { "wrong" };
                    auth.authenticate_admin("admin", password);
                }
            });
        }
    });

    if let Some(state) = auth.authenticator().tracker().state("admin") {
        assert!(state.failure_count <= 5);
    }
}

#[test]
fn test_concurrent_migration_leaves_one_valid_hash() {
    let (auth, _clock) = setup_seeded_auth();

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                assert!(auth.authenticate_pharmacist("pharma", "pills4u").is_some());
            });
        }
    });

    let stored = auth.directory().pharmacists.find_by_id(30).unwrap().read().password.clone();
    assert!(verify_password("pills4u", &stored));
}
