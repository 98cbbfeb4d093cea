//! Crate-wide error types

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised by the scheduler, the store, or the trainer glue
#[derive(Debug, Error)]
pub enum Error {
    #[error("Must provide \"{0}\" argument")]
    MissingArgument(&'static str),

    #[error("Corrupt search state: {0}")]
    CorruptState(String),

    #[error("No configuration finished training")]
    NoTrials,

    #[error("No training history for configuration: {0}")]
    EmptyHistory(String),

    #[error("No best configuration recorded at {0}")]
    NoBest(PathBuf),

    #[error("Trainer exited with {status} for configuration {name}")]
    TrainerFailed { name: String, status: ExitStatus },

    #[error("Invalid clean mode: {0} (expected 1 or 2)")]
    InvalidCleanMode(u8),

    #[error("Invalid hyperparameter assignment: {0} (expected key=value)")]
    InvalidAssignment(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, Error>;
