//! Error types for the CLI application.

use crate::snapshot::SnapshotError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Path resolution error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine error
    #[error(transparent)]
    Engine(#[from] autoremove_engine::EngineError),

    /// Document store error
    #[error(transparent)]
    Store(#[from] autoremove_engine::StoreError),

    /// Snapshot host error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
