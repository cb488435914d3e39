// ============================
// crates/auth-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod authenticator;
pub mod password;
pub mod rate_limit;
mod service;
mod service_impl;

pub use authenticator::CredentialAuthenticator;
pub use password::{hash_password, is_canonical, verify_password, PasswordHasher, CREDENTIAL_TAG};
pub use rate_limit::{AttemptGate, LoginAttemptState, LoginAttemptTracker, DEFAULT_LOCKOUT_SECS, DEFAULT_MAX_ATTEMPTS};
pub use service::{AuthService, AuthenticatedUser};
pub use service_impl::DefaultAuth;
