//! Error types for engine operations

use thiserror::Error;

/// Errors that can occur during a pass or a control operation
#[derive(Error, Debug)]
pub enum EngineError {
    /// Host registry error that prevents the whole pass (listing, free space)
    #[error("Host error: {0}")]
    Host(String),

    /// Persistence error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker error (lock poisoning, tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Errors raised by the document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write a document
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Document path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse failure
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization failure
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Errors raised while validating or merging configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is out of range
    #[error("Invalid value for '{key}': {reason}")]
    Invalid {
        /// Persisted key name
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A patch could not be merged into the current configuration
    #[error("Failed to merge configuration: {0}")]
    Merge(String),
}
