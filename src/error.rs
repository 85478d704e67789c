//! Crate-wide error types

use thiserror::Error;

/// Errors raised by the medml pipeline
#[derive(Error, Debug)]
pub enum MedmlError {
    /// Malformed or empty dataset, schema mismatch, class attribute problems
    #[error("Data error: {0}")]
    DataError(String),

    /// Unparseable report line or malformed numeric token
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid fold count, unknown balancing mode, bad CLI parameters
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Failure inside an external classifier implementation
    #[error("Training error: {0}")]
    TrainingError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for medml operations
pub type Result<T> = std::result::Result<T, MedmlError>;
