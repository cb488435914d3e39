// ============================
// crates/auth-lib/src/metrics.rs
// ============================
//! Central place for authentication metric keys
pub const AUTH_SUCCESS: &str = "auth.success";
pub const AUTH_FAILURE: &str = "auth.failure";
pub const AUTH_LOCKOUT: &str = "auth.lockout";
pub const AUTH_REJECTED_INPUT: &str = "auth.rejected_input";
pub const CREDENTIAL_MIGRATED: &str = "auth.credential_migrated";
