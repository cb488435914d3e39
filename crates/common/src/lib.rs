// ============================
// crates/common/src/lib.rs
// ============================
//! Account types shared between the pharmacy authentication engine,
//! its storage layer and the command-line front end.
//!
//! Every user category stores its credential in a `password` field that holds
//! either a legacy plaintext value or the canonical `$SHA$salt$hash` form.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Handle to an account owned by a role repository.
///
/// Clones share the same account, so a credential rewritten through one
/// handle is seen by every other holder.
pub type SharedAccount<A> = Arc<RwLock<A>>;

/// User category an account belongs to
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
    Doctor,
    Pharmacist,
}

impl Role {
    /// All roles, in the order the login screen offers them
    pub const ALL: [Role; 4] = [Role::Admin, Role::Patient, Role::Doctor, Role::Pharmacist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Pharmacist => "pharmacist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// Capability the authentication engine needs from an account:
/// a username, a stored credential, and the ability to replace it.
pub trait HasCredential: Send + Sync + 'static {
    /// Category every value of this type belongs to
    const ROLE: Role;

    fn id(&self) -> u64;
    fn username(&self) -> &str;
    /// Stored credential, plaintext or canonical
    fn credential(&self) -> &str;
    fn set_credential(&mut self, credential: String);

    fn role(&self) -> Role {
        Self::ROLE
    }
}

/// System administrator
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: u64,
    pub username: String,
    pub password: String,
}

/// Registered patient
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: u64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

/// Prescribing doctor
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: u64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub specialization: String,
}

/// Dispensing pharmacist
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Pharmacist {
    pub id: u64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

macro_rules! impl_has_credential {
    ($ty:ty, $role:expr) => {
        impl HasCredential for $ty {
            const ROLE: Role = $role;

            fn id(&self) -> u64 {
                self.id
            }

            fn username(&self) -> &str {
                &self.username
            }

            fn credential(&self) -> &str {
                &self.password
            }

            fn set_credential(&mut self, credential: String) {
                self.password = credential;
            }
        }
    };
}

impl_has_credential!(Admin, Role::Admin);
impl_has_credential!(Patient, Role::Patient);
impl_has_credential!(Doctor, Role::Doctor);
impl_has_credential!(Pharmacist, Role::Pharmacist);

impl Admin {
    pub fn new(id: u64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Patient {
    pub fn new(id: u64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            full_name: String::new(),
        }
    }
}

impl Doctor {
    pub fn new(id: u64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            full_name: String::new(),
            specialization: String::new(),
        }
    }
}

impl Pharmacist {
    pub fn new(id: u64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            full_name: String::new(),
        }
    }
}

/// Wrap an account in a shareable handle
pub fn share<A: HasCredential>(account: A) -> SharedAccount<A> {
    Arc::new(RwLock::new(account))
}
