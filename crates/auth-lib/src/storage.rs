// ============================
// crates/auth-lib/src/storage.rs
// ============================
//! Account persistence with a flat-file implementation.
//!
//! Stored credentials are written exactly as held in memory, so canonical
//! `$SHA$...` strings and not-yet-migrated plaintext both round-trip unchanged.
use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use pharmacy_common::Role;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs as tokio_fs;
use tracing::debug;

use crate::directory::{AccountDirectory, RoleRepository};
use crate::error::AppError;

/// Trait for account storage backends
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Load every role's accounts
    async fn load(&self) -> Result<AccountDirectory, AppError>;

    /// Persist every role's accounts
    async fn save(&self, directory: &AccountDirectory) -> Result<(), AppError>;
}

/// One JSON array per role under `<root>/accounts/`
#[derive(Clone, Debug)]
pub struct FlatFileAccountStore {
    root: PathBuf,
}

impl FlatFileAccountStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("accounts"))?;
        Ok(Self { root })
    }

    /// Path of the file holding `role`'s accounts
    pub fn role_path(&self, role: Role) -> PathBuf {
        let file = match role {
            Role::Admin => "admins.json",
            Role::Patient => "patients.json",
            Role::Doctor => "doctors.json",
            Role::Pharmacist => "pharmacists.json",
        };
        self.root.join("accounts").join(file)
    }

    async fn read_role<A>(&self, role: Role) -> Result<Vec<A>, AppError>
    where
        A: DeserializeOwned + Send,
    {
        let path = self.role_path(role);

        if !tokio_fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let accounts: Vec<A> = serde_json::from_str(&content)?;
        debug!(%role, count = accounts.len(), "accounts loaded");
        Ok(accounts)
    }

    async fn write_role(&self, role: Role, json: String) -> Result<(), AppError> {
        let path = self.role_path(role);
        let tmp = path.with_extension("json.tmp");

        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

fn to_json<A: Serialize>(accounts: &[A]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(accounts)?)
}

#[async_trait]
impl AccountStore for FlatFileAccountStore {
    async fn load(&self) -> Result<AccountDirectory, AppError> {
        Ok(AccountDirectory {
            admins: RoleRepository::from_accounts(self.read_role(Role::Admin).await?)?,
            patients: RoleRepository::from_accounts(self.read_role(Role::Patient).await?)?,
            doctors: RoleRepository::from_accounts(self.read_role(Role::Doctor).await?)?,
            pharmacists: RoleRepository::from_accounts(self.read_role(Role::Pharmacist).await?)?,
        })
    }

    async fn save(&self, directory: &AccountDirectory) -> Result<(), AppError> {
        // serialise everything before touching the disk
        let files = [
            (Role::Admin, to_json(&directory.admins.snapshot())?),
            (Role::Patient, to_json(&directory.patients.snapshot())?),
            (Role::Doctor, to_json(&directory.doctors.snapshot())?),
            (Role::Pharmacist, to_json(&directory.pharmacists.snapshot())?),
        ];

        for (role, json) in files {
            self.write_role(role, json).await?;
        }
        debug!(total = directory.total(), "accounts saved");
        Ok(())
    }
}
