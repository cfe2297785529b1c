//! Tracing subscriber setup.
//!
//! One-shot init at the configured level. `RUST_LOG` takes precedence
//! when set so operators can raise verbosity per target without touching
//! the config file.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub fn init(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::Logger(format!("invalid log level {level:?}: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logger(format!("subscriber init failed: {e}")))
}
