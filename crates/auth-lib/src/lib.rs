// ============================
// crates/auth-lib/src/lib.rs
// ============================
//! Credential authentication and account lockout for the pharmacy
//! management application.

pub mod auth;
pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{CredentialAuthenticator, DefaultAuth};
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::{AccountStore, FlatFileAccountStore};

/// Application state shared by the login front ends
pub struct AppState<S> {
    /// Authentication service bound to the loaded accounts
    pub auth: Arc<DefaultAuth>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
    /// Storage backend the accounts came from
    pub storage: S,
}

impl<S: AccountStore> AppState<S> {
    /// Self-test the hasher, load accounts and wire the service together
    pub async fn new(storage: S, settings: Settings, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let authenticator = CredentialAuthenticator::from_settings(&settings.lockout, clock)?;
        let directory = Arc::new(storage.load().await?);
        tracing::info!(accounts = directory.total(), "account directory loaded");

        Ok(Self {
            auth: Arc::new(DefaultAuth::new(directory, authenticator)),
            settings: Arc::new(settings),
            storage,
        })
    }

    /// Write the accounts back, e.g. after a credential was migrated
    pub async fn persist(&self) -> Result<(), AppError> {
        self.storage.save(self.auth.directory()).await
    }
}

impl AppState<FlatFileAccountStore> {
    /// Build state from settings using the flat-file store and the system clock
    pub async fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let storage = FlatFileAccountStore::new(&settings.data_dir)?;
        Self::new(storage, settings, Arc::new(SystemClock)).await
    }
}
