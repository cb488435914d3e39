// ============================
// crates/auth-lib/src/auth/rate_limit.rs
// ============================
//! Per-username failure counting and time-boxed lockout.
//!
//! Entries are keyed by the exact username string supplied at login, whether
//! or not an account with that name exists. Expired lockouts are dropped
//! lazily, the next time the username is checked.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LockoutSettings;
use crate::metrics::AUTH_LOCKOUT;

/// Default number of failed attempts before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (15 minutes)
pub const DEFAULT_LOCKOUT_SECS: u64 = 15 * 60;

/// Number of striped gates serialising attempts per username
const GATE_STRIPES: usize = 64;

/// Failure bookkeeping for one username
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginAttemptState {
    /// Consecutive failed attempts
    pub failure_count: u32,
    /// When the lockout started, if one is in force
    pub locked_at: Option<DateTime<Utc>>,
}

/// Held for the duration of one authentication attempt.
///
/// While held, no other attempt for a username mapping to the same stripe can
/// run its lockout check.
pub struct AttemptGate<'a> {
    _guard: MutexGuard<'a, ()>,
}

/// Tracks failed logins and lockouts
pub struct LoginAttemptTracker {
    attempts: DashMap<String, LoginAttemptState>,
    gates: Box<[Mutex<()>]>,
    max_attempts: u32,
    lockout_duration: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for LoginAttemptTracker {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::seconds(DEFAULT_LOCKOUT_SECS as i64),
            Arc::new(SystemClock),
        )
    }
}

impl LoginAttemptTracker {
    /// Create a tracker with explicit limits
    pub fn new(max_attempts: u32, lockout_duration: Duration, clock: Arc<dyn Clock>) -> Self {
        let gates = (0..GATE_STRIPES).map(|_| Mutex::new(())).collect();
        Self {
            attempts: DashMap::new(),
            gates,
            max_attempts: max_attempts.max(1),
            lockout_duration,
            clock,
        }
    }

    /// Create a tracker from configured limits
    pub fn from_settings(settings: &LockoutSettings, clock: Arc<dyn Clock>) -> Self {
        Self::new(settings.max_attempts, settings.lockout_duration(), clock)
    }

    /// Serialise attempts for `username`
    pub fn gate(&self, username: &str) -> AttemptGate<'_> {
        let mut hasher = DefaultHasher::new();
        username.hash(&mut hasher);
        let stripe = (hasher.finish() as usize) % self.gates.len();
        AttemptGate {
            _guard: self.gates[stripe].lock(),
        }
    }

    /// Check whether `username` is currently locked out.
    ///
    /// An expired lockout is cleared here, together with its failure count.
    pub fn is_locked(&self, username: &str) -> bool {
        let locked_at = match self.attempts.get(username) {
            Some(entry) => entry.locked_at,
            None => return false,
        };

        match locked_at {
            None => false,
            Some(at) if self.is_expired(at) => {
                self.attempts.remove(username);
                debug!(username, "lockout expired");
                false
            },
            Some(_) => true,
        }
    }

    /// Record a failed attempt, returning the attempts left before lockout
    pub fn record_failure(&self, username: &str) -> u32 {
        let mut entry = self.attempts.entry(username.to_string()).or_default();

        if let Some(at) = entry.locked_at {
            if self.is_expired(at) {
                *entry = LoginAttemptState::default();
            }
        }

        entry.failure_count = entry.failure_count.saturating_add(1);

        if entry.failure_count < self.max_attempts {
            return self.max_attempts - entry.failure_count;
        }

        if entry.locked_at.is_none() {
            entry.locked_at = Some(self.clock.now());
            metrics::counter!(AUTH_LOCKOUT).increment(1);
            warn!(
                username,
                failures = entry.failure_count,
                lockout_secs = self.lockout_duration.num_seconds(),
                "login locked after repeated failures"
            );
        }
        0
    }

    /// Forget all failures for `username`
    pub fn record_success(&self, username: &str) {
        self.attempts.remove(username);
    }

    /// Attempts left before lockout, 0 while locked
    pub fn remaining_attempts(&self, username: &str) -> u32 {
        if self.is_locked(username) {
            return 0;
        }
        let failures = self
            .attempts
            .get(username)
            .map(|entry| entry.failure_count)
            .unwrap_or(0);
        self.max_attempts.saturating_sub(failures)
    }

    /// Time left on an active lockout
    pub fn lockout_remaining(&self, username: &str) -> Option<Duration> {
        if !self.is_locked(username) {
            return None;
        }
        let locked_at = self.attempts.get(username)?.locked_at?;
        let elapsed = self.clock.now() - locked_at;
        Some((self.lockout_duration - elapsed).max(Duration::zero()))
    }

    /// Snapshot of the state tracked for `username`
    pub fn state(&self, username: &str) -> Option<LoginAttemptState> {
        self.attempts.get(username).map(|entry| entry.clone())
    }

    /// Number of usernames with failure state
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }

    fn is_expired(&self, locked_at: DateTime<Utc>) -> bool {
        self.clock.now() - locked_at > self.lockout_duration
    }
}
