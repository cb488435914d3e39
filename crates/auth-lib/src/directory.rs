// ============================
// crates/auth-lib/src/directory.rs
// ============================
//! In-memory account repositories, one per user category.
use std::sync::Arc;

use parking_lot::RwLock;
use pharmacy_common::{share, Admin, Doctor, HasCredential, Patient, Pharmacist, Role, SharedAccount};

use crate::auth::password::is_canonical;
use crate::error::AppError;

/// Accounts of one category.
///
/// Usernames are unique within the repository, compared exactly.
pub struct RoleRepository<A> {
    accounts: RwLock<Vec<SharedAccount<A>>>,
}

impl<A> Default for RoleRepository<A> {
    fn default() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
        }
    }
}

impl<A: HasCredential + Clone> RoleRepository<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository, rejecting duplicate usernames
    pub fn from_accounts(accounts: Vec<A>) -> Result<Self, AppError> {
        let repo = Self::new();
        for account in accounts {
            repo.insert(account)?;
        }
        Ok(repo)
    }

    /// Add an account
    pub fn insert(&self, account: A) -> Result<SharedAccount<A>, AppError> {
        let mut accounts = self.accounts.write();
        if accounts.iter().any(|a| a.read().username() == account.username()) {
            return Err(AppError::DuplicateUsername {
                role: A::ROLE.to_string(),
                username: account.username().to_string(),
            });
        }
        let shared = share(account);
        accounts.push(Arc::clone(&shared));
        Ok(shared)
    }

    /// Exact, case-sensitive lookup
    pub fn find_by_username(&self, username: &str) -> Option<SharedAccount<A>> {
        self.accounts
            .read()
            .iter()
            .find(|a| a.read().username() == username)
            .cloned()
    }

    /// ASCII case-insensitive lookup; the first match in insertion order wins
    pub fn find_by_username_ignore_case(&self, username: &str) -> Option<SharedAccount<A>> {
        self.accounts
            .read()
            .iter()
            .find(|a| a.read().username().eq_ignore_ascii_case(username))
            .cloned()
    }

    pub fn find_by_id(&self, id: u64) -> Option<SharedAccount<A>> {
        self.accounts.read().iter().find(|a| a.read().id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Owned copies of every account, for persistence
    pub fn snapshot(&self) -> Vec<A> {
        self.accounts.read().iter().map(|a| a.read().clone()).collect()
    }

    /// Accounts still holding a legacy plaintext credential
    pub fn plaintext_count(&self) -> usize {
        self.accounts
            .read()
            .iter()
            .filter(|a| !is_canonical(a.read().credential()))
            .count()
    }
}

/// Every account repository the application owns
#[derive(Default)]
pub struct AccountDirectory {
    pub admins: RoleRepository<Admin>,
    pub patients: RoleRepository<Patient>,
    pub doctors: RoleRepository<Doctor>,
    pub pharmacists: RoleRepository<Pharmacist>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of accounts across all roles
    pub fn total(&self) -> usize {
        self.admins.len() + self.patients.len() + self.doctors.len() + self.pharmacists.len()
    }

    /// Legacy plaintext credentials left, per role
    pub fn plaintext_report(&self) -> Vec<(Role, usize)> {
        vec![
            (Role::Admin, self.admins.plaintext_count()),
            (Role::Patient, self.patients.plaintext_count()),
            (Role::Doctor, self.doctors.plaintext_count()),
            (Role::Pharmacist, self.pharmacists.plaintext_count()),
        ]
    }
}
