// ============================
// crates/auth-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Canonical stored credentials look like `$SHA$<base64 salt>$<base64 digest>`
//! where the digest is SHA-256 over the 16-byte salt followed by the UTF-8
//! password. Anything else is treated as a legacy plaintext credential.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::AppError;

/// Prefix marking a canonical credential
pub const CREDENTIAL_TAG: &str = "$SHA$";

/// Salt size in bytes
pub const SALT_LEN: usize = 16;

/// SHA-256("abc"), used by the startup self-test
const KNOWN_ANSWER: [u8; 32] = [
    0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae, 0x22, 0x23,
    0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61, 0xf2, 0x00, 0x15, 0xad,
];

/// Fills a salt buffer with random bytes
pub type SaltSource = fn(&mut [u8]) -> Result<(), AppError>;

/// Salted SHA-256 credential hasher.
///
/// Only obtainable through [`PasswordHasher::new`], which refuses to hand out
/// a hasher if the digest or the OS random source misbehaves.
#[derive(Clone, Copy)]
pub struct PasswordHasher {
    fill_salt: SaltSource,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Run the self-test and return a ready hasher
    pub fn new() -> Result<Self, AppError> {
        self_test()?;
        Ok(Self { fill_salt: os_salt })
    }

    /// Hasher drawing salt from `fill_salt`, without the self-test
    #[cfg(test)]
    pub(crate) fn with_salt_source(fill_salt: SaltSource) -> Self {
        Self { fill_salt }
    }

    /// Hash a plaintext password into canonical form
    pub fn hash(&self, plain: &str) -> Result<String, AppError> {
        let mut salt = [0u8; SALT_LEN];
        (self.fill_salt)(&mut salt)?;
        Ok(encode_credential(&salt, plain))
    }

    /// Hash a password and zeroize the original
    pub fn hash_secure(&self, plain: &mut String) -> Result<String, AppError> {
        let hash = self.hash(plain);
        plain.zeroize();
        hash
    }

    /// Verify a plaintext password against a canonical credential
    pub fn verify(&self, plain: &str, stored: &str) -> bool {
        verify_password(plain, stored)
    }
}

/// Hash a password with a fresh random salt
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LEN];
    os_salt(&mut salt)?;
    Ok(encode_credential(&salt, plain))
}

/// Verify a password against a stored canonical credential.
///
/// Malformed or non-canonical input yields `false`, never an error.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Some((salt, expected)) = decode_credential(stored) else {
        return false;
    };
    let actual = digest(&salt, plain);
    constant_time_eq(&actual, &expected)
}

/// Whether a stored credential is already in canonical form
pub fn is_canonical(stored: &str) -> bool {
    stored.starts_with(CREDENTIAL_TAG)
}

/// Compare two byte strings without an early exit on the first difference
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

fn os_salt(salt: &mut [u8]) -> Result<(), AppError> {
    OsRng
        .try_fill_bytes(salt)
        .map_err(|e| AppError::Hashing(format!("random source unavailable: {e}")))
}

fn digest(salt: &[u8], plain: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plain.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

fn encode_credential(salt: &[u8], plain: &str) -> String {
    let hash = digest(salt, plain);
    format!("{CREDENTIAL_TAG}{}${}", STANDARD.encode(salt), STANDARD.encode(hash))
}

fn decode_credential(stored: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    let rest = stored.strip_prefix(CREDENTIAL_TAG)?;
    let mut fields = rest.split('$');
    let (Some(salt), Some(hash), None) = (fields.next(), fields.next(), fields.next()) else {
        return None;
    };
    if salt.is_empty() || hash.is_empty() {
        return None;
    }
    let salt = STANDARD.decode(salt).ok()?;
    let hash = STANDARD.decode(hash).ok()?;
    Some((salt, hash))
}

fn self_test() -> Result<(), AppError> {
    let known = Sha256::digest(b"abc");
    if !constant_time_eq(known.as_slice(), &KNOWN_ANSWER) {
        return Err(AppError::Hashing("SHA-256 known-answer test failed".to_string()));
    }

    let probe = hash_password("self-test")?;
    if !verify_password("self-test", &probe) || verify_password("self-test!", &probe) {
        return Err(AppError::Hashing("hash/verify round trip failed".to_string()));
    }

    Ok(())
}
