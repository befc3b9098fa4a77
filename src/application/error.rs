//! Application-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Failures of import, persistence and configuration.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("forest has no name to save it under")]
    UnnamedForest,

    #[error("invalid forest name '{0}': must be a plain file name")]
    InvalidForestName(String),

    #[error("Error opening/reading {}", .0.display())]
    ForestNotFound(PathBuf),

    #[error("corrupt forest file {}: {message}", path.display())]
    CorruptForest { path: PathBuf, message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
