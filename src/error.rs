//! Error types for the docsift crate

use thiserror::Error;

/// Result type for docsift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for docsift operations
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid extractor configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Record extraction error
    #[error("Extract error: {0}")]
    Extract(String),

    /// Worker or pool error
    #[error("Worker error: {0}")]
    Worker(String),
}
