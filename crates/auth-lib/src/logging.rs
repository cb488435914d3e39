// ============================
// crates/auth-lib/src/logging.rs
// ============================
//! Tracing subscriber setup.
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::error::AppError;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Output goes to stderr
/// so stdout stays free for command results.
pub fn init(settings: &Settings) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .map_err(|e| AppError::Config(format!("invalid log filter: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if settings.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| AppError::Config(format!("logging already initialised: {e}")))
}
