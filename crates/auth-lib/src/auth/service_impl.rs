// ============================
// crates/auth-lib/src/auth/service_impl.rs
// ============================
use std::sync::Arc;

use pharmacy_common::{Admin, Doctor, HasCredential, Patient, Pharmacist, Role, SharedAccount};

use crate::auth::{AuthService, AuthenticatedUser, CredentialAuthenticator};
use crate::directory::AccountDirectory;
use crate::error::AppError;
use crate::validation::validate_credentials;

/// [`AuthService`] over an in-memory [`AccountDirectory`]
pub struct DefaultAuth {
    directory: Arc<AccountDirectory>,
    authenticator: CredentialAuthenticator,
}

impl DefaultAuth {
    pub fn new(directory: Arc<AccountDirectory>, authenticator: CredentialAuthenticator) -> Self {
        Self {
            directory,
            authenticator,
        }
    }

    pub fn directory(&self) -> &Arc<AccountDirectory> {
        &self.directory
    }

    pub fn authenticator(&self) -> &CredentialAuthenticator {
        &self.authenticator
    }

    fn rejection(&self, username: &str) -> AppError {
        match self.authenticator.lockout_remaining(username) {
            Some(left) => AppError::AuthRateLimited {
                retry_after_secs: left.num_seconds().max(0) as u64,
            },
            None => AppError::InvalidCredentials {
                remaining_attempts: self.authenticator.remaining_attempts(username),
            },
        }
    }
}

impl AuthService for DefaultAuth {
    fn authenticate_admin(&self, username: &str, password: &str) -> Option<SharedAccount<Admin>> {
        self.authenticator
            .authenticate(username, password, |name| self.directory.admins.find_by_username(name))
    }

    // Patients are the one category matched regardless of case. Unifying this
    // with the other roles would change which stored usernames can log in.
    fn authenticate_patient(&self, username: &str, password: &str) -> Option<SharedAccount<Patient>> {
        self.authenticator.authenticate(username, password, |name| {
            self.directory.patients.find_by_username_ignore_case(name)
        })
    }

    fn authenticate_doctor(&self, username: &str, password: &str) -> Option<SharedAccount<Doctor>> {
        self.authenticator
            .authenticate(username, password, |name| self.directory.doctors.find_by_username(name))
    }

    fn authenticate_pharmacist(&self, username: &str, password: &str) -> Option<SharedAccount<Pharmacist>> {
        self.authenticator.authenticate(username, password, |name| {
            self.directory.pharmacists.find_by_username(name)
        })
    }

    fn is_locked(&self, username: &str) -> bool {
        self.authenticator.is_locked(username)
    }

    fn login(&self, role: Role, username: &str, password: &str) -> Result<AuthenticatedUser, AppError> {
        validate_credentials(username, password)?;

        let user = match role {
            Role::Admin => self.authenticate_admin(username, password).map(identify),
            Role::Patient => self.authenticate_patient(username, password).map(identify),
            Role::Doctor => self.authenticate_doctor(username, password).map(identify),
            Role::Pharmacist => self.authenticate_pharmacist(username, password).map(identify),
        };

        user.ok_or_else(|| self.rejection(username))
    }
}

fn identify<A: HasCredential>(account: SharedAccount<A>) -> AuthenticatedUser {
    let account = account.read();
    AuthenticatedUser::from_account(&*account)
}
