// ============================
// crates/auth-lib/src/error.rs
// ============================
//! Central error type for the authentication engine.
use thiserror::Error;

use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Wrong password and unknown username both land here.
    #[error("Invalid credentials ({remaining_attempts} attempts remaining)")]
    InvalidCredentials { remaining_attempts: u32 },

    #[error("Authentication rate limit exceeded, retry in {retry_after_secs}s")]
    AuthRateLimited { retry_after_secs: u64 },

    #[error("Password hashing unavailable: {0}")]
    Hashing(String),

    #[error("Username already exists for {role}: {username}")]
    DuplicateUsername { role: String, username: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials { .. } => "AUTH_001",
            AppError::Validation(_) => "AUTH_002",
            AppError::AuthRateLimited { .. } => "AUTH_003",
            AppError::Hashing(_) => "AUTH_004",
            AppError::DuplicateUsername { .. } => "ACC_001",
            AppError::Config(_) => "CFG_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a message safe to show on the login screen
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::InvalidCredentials { remaining_attempts } => {
                if *remaining_attempts > 0 {
                    format!("Invalid username or password. {remaining_attempts} attempts remaining")
                } else {
                    "Invalid username or password".to_string()
                }
            },
            AppError::AuthRateLimited { retry_after_secs } => {
                let minutes = retry_after_secs.div_ceil(60).max(1);
                format!("Too many failed attempts, please try again in {minutes} minutes")
            },
            AppError::DuplicateUsername { .. } => "Username is already taken".to_string(),
            AppError::Hashing(_)
            | AppError::Config(_)
            | AppError::Internal(_)
            | AppError::Io(_)
            | AppError::Json(_) => "An internal error occurred".to_string(),
        }
    }

    /// Whether the error is an ordinary login rejection rather than a fault
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidCredentials { .. }
                | AppError::AuthRateLimited { .. }
        )
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
