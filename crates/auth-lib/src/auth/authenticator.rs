// ============================
// crates/auth-lib/src/auth/authenticator.rs
// ============================
//! Credential authentication shared by every user category.
//!
//! One attempt runs: input validation, lockout check, account lookup,
//! password verification (upgrading legacy plaintext credentials), then
//! failure/success bookkeeping. Everything from the lockout check onward runs
//! under the username's attempt gate.
use std::sync::Arc;

use chrono::Duration;
use parking_lot::RwLockUpgradableReadGuard;
use pharmacy_common::{HasCredential, SharedAccount};
use tracing::{debug, error, info};

use super::password::{constant_time_eq, is_canonical, PasswordHasher};
use super::rate_limit::LoginAttemptTracker;
use crate::clock::Clock;
use crate::config::LockoutSettings;
use crate::error::AppError;
use crate::metrics::{AUTH_FAILURE, AUTH_REJECTED_INPUT, AUTH_SUCCESS, CREDENTIAL_MIGRATED};
use crate::validation::validate_credentials;

/// Turns a username/password pair into an account
pub struct CredentialAuthenticator {
    hasher: PasswordHasher,
    tracker: LoginAttemptTracker,
}

impl CredentialAuthenticator {
    pub fn new(hasher: PasswordHasher, tracker: LoginAttemptTracker) -> Self {
        Self { hasher, tracker }
    }

    /// Build from configured lockout limits, self-testing the hasher
    pub fn from_settings(settings: &LockoutSettings, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let hasher = PasswordHasher::new()?;
        Ok(Self::new(hasher, LoginAttemptTracker::from_settings(settings, clock)))
    }

    pub fn tracker(&self) -> &LoginAttemptTracker {
        &self.tracker
    }

    /// Authenticate against the accounts reachable through `lookup`.
    ///
    /// Returns `None` for invalid input, an active lockout, an unknown
    /// username or a wrong password alike. A legacy plaintext credential that
    /// matches is rewritten to canonical form before this returns; if that
    /// rewrite fails the attempt is refused without counting as a failure.
    pub fn authenticate<A, F>(&self, username: &str, password: &str, lookup: F) -> Option<SharedAccount<A>>
    where
        A: HasCredential,
        F: FnOnce(&str) -> Option<SharedAccount<A>>,
    {
        if let Err(reason) = validate_credentials(username, password) {
            metrics::counter!(AUTH_REJECTED_INPUT).increment(1);
            debug!(username, role = %A::ROLE, %reason, "login input rejected");
            return None;
        }

        let _gate = self.tracker.gate(username);

        if self.tracker.is_locked(username) {
            debug!(username, role = %A::ROLE, "login refused while locked out");
            return None;
        }

        let Some(account) = lookup(username) else {
            self.fail::<A>(username);
            return None;
        };

        match self.verify_and_upgrade(&account, password) {
            Verification::Accepted => {},
            Verification::Rejected => {
                self.fail::<A>(username);
                return None;
            },
            Verification::MigrationFailed => return None,
        }

        self.tracker.record_success(username);
        metrics::counter!(AUTH_SUCCESS).increment(1);
        info!(username, role = %A::ROLE, "login succeeded");
        Some(account)
    }

    /// Whether `username` is currently locked out
    pub fn is_locked(&self, username: &str) -> bool {
        self.tracker.is_locked(username)
    }

    pub fn remaining_attempts(&self, username: &str) -> u32 {
        self.tracker.remaining_attempts(username)
    }

    pub fn lockout_remaining(&self, username: &str) -> Option<Duration> {
        self.tracker.lockout_remaining(username)
    }

    fn verify_and_upgrade<A: HasCredential>(&self, account: &SharedAccount<A>, password: &str) -> Verification {
        let guard = account.upgradable_read();

        if is_canonical(guard.credential()) {
            return if self.hasher.verify(password, guard.credential()) {
                Verification::Accepted
            } else {
                Verification::Rejected
            };
        }

        if !constant_time_eq(guard.credential().as_bytes(), password.as_bytes()) {
            return Verification::Rejected;
        }

        // an account is never handed out while its credential is still plaintext
        match self.hasher.hash(password) {
            Ok(hashed) => {
                let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
                guard.set_credential(hashed);
                metrics::counter!(CREDENTIAL_MIGRATED).increment(1);
                info!(username = guard.username(), role = %A::ROLE, "plaintext credential migrated");
                Verification::Accepted
            },
            Err(e) => {
                error!(username = guard.username(), role = %A::ROLE, error = %e, "credential migration failed, login refused");
                Verification::MigrationFailed
            },
        }
    }

    fn fail<A: HasCredential>(&self, username: &str) {
        let remaining = self.tracker.record_failure(username);
        metrics::counter!(AUTH_FAILURE).increment(1);
        debug!(username, role = %A::ROLE, remaining, "login failed");
    }
}

/// Outcome of checking a password against one account
enum Verification {
    Accepted,
    Rejected,
    /// Correct legacy password, but the canonical rewrite failed
    MigrationFailed,
}
