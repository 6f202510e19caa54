//! Error types for the TimeVault sweeper.

use thiserror::Error;

/// All errors produced by the sweeper crates.
#[derive(Debug, Error)]
pub enum TimeVaultError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Push error: {0}")]
    Push(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, TimeVaultError>;
