//! Error types for the apksign core library.

use thiserror::Error;

/// Core error type for the apksign tool server.
#[derive(Error, Debug)]
pub enum ApkSignError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Execution(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for apksign operations.
pub type Result<T> = std::result::Result<T, ApkSignError>;
