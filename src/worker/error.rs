//! Error types for the worker module

use crate::error::Error as CrateError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for worker operations
///
/// None of these reach the coordinator as a failed task: a page that cannot
/// be read or extracted still finishes with zero records.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Page file could not be read for a reason other than being absent
    #[error("Unable to read file {}: {}", .path.display(), .source)]
    Read {
        /// Path of the page
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Protocol stream error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol message could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A worker hung up before finishing its task
    #[error("Worker {0} channel closed")]
    ChannelClosed(usize),

    /// Error during task joining
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl From<WorkerError> for CrateError {
    fn from(err: WorkerError) -> Self {
        match err {
            WorkerError::Io(e) => CrateError::Io(e),
            WorkerError::Json(e) => CrateError::Json(e),
            _ => CrateError::Worker(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for WorkerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(format!("Failed to join task: {}", err))
    }
}
