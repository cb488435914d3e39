// ============================
// crates/auth-lib/src/auth/service.rs
// ============================
use pharmacy_common::{Admin, Doctor, HasCredential, Patient, Pharmacist, Role, SharedAccount};
use serde::Serialize;

use crate::error::AppError;

/// Identity returned by a successful [`AuthService::login`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn from_account<A: HasCredential>(account: &A) -> Self {
        Self {
            id: account.id(),
            username: account.username().to_string(),
            role: A::ROLE,
        }
    }
}

/// Login entry points, one per user category.
///
/// Only the patient entry point matches usernames case-insensitively; the
/// others require an exact match. Lockout is always keyed by the username as
/// typed.
pub trait AuthService: Send + Sync {
    fn authenticate_admin(&self, username: &str, password: &str) -> Option<SharedAccount<Admin>>;
    fn authenticate_patient(&self, username: &str, password: &str) -> Option<SharedAccount<Patient>>;
    fn authenticate_doctor(&self, username: &str, password: &str) -> Option<SharedAccount<Doctor>>;
    fn authenticate_pharmacist(&self, username: &str, password: &str) -> Option<SharedAccount<Pharmacist>>;

    /// Whether `username` is currently locked out
    fn is_locked(&self, username: &str) -> bool;

    /// Authenticate for `role` and explain a rejection
    fn login(&self, role: Role, username: &str, password: &str) -> Result<AuthenticatedUser, AppError>;
}
