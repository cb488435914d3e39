// ============================
// crates/auth-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::rate_limit::{DEFAULT_LOCKOUT_SECS, DEFAULT_MAX_ATTEMPTS};
use crate::error::AppError;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pharmacy-auth.toml";

/// Prefix for environment overrides, e.g. `PHARMACY_LOCKOUT__MAX_ATTEMPTS=3`
pub const ENV_PREFIX: &str = "PHARMACY_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Longest lockout window accepted from configuration (one day)
const MAX_LOCKOUT_SECS: u64 = 24 * 60 * 60;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the per-role account files
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Lockout policy
    pub lockout: LockoutSettings,
}

/// Lockout policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutSettings {
    /// Consecutive failures before a username is locked
    pub max_attempts: u32,
    /// Lockout window in seconds
    pub lockout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_json: false,
            lockout: LockoutSettings::default(),
        }
    }
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout_secs: DEFAULT_LOCKOUT_SECS,
        }
    }
}

impl LockoutSettings {
    pub fn lockout_duration(&self) -> Duration {
        Duration::seconds(self.lockout_secs.min(MAX_LOCKOUT_SECS) as i64)
    }
}

impl Settings {
    /// Load settings from `pharmacy-auth.toml` and the environment
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from an explicit file, then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings: Settings = Self::figment(path.as_ref()).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Layered providers: defaults, file, environment
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check that the settings make sense
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(AppError::Config(format!("unknown log level: {}", self.log_level)));
        }

        if self.lockout.max_attempts == 0 {
            return Err(AppError::Config("lockout.max_attempts must be at least 1".to_string()));
        }

        if self.lockout.lockout_secs == 0 || self.lockout.lockout_secs > MAX_LOCKOUT_SECS {
            return Err(AppError::Config(format!(
                "lockout.lockout_secs must be between 1 and {MAX_LOCKOUT_SECS}"
            )));
        }

        Ok(())
    }
}
