//! Application-wide error types.
//!
//! Bootstrap failures only. Provider failures use
//! [`ProviderError`](crate::inference::ProviderError) and never leave the
//! router.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
