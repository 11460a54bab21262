//! Error types shared across Velotrace crates.

use std::path::PathBuf;

/// Top-level error type for Velotrace operations.
#[derive(Debug, thiserror::Error)]
pub enum VelotraceError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Replay error: {message}")]
    Replay { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VelotraceError.
pub type VelotraceResult<T> = Result<T, VelotraceError>;

impl VelotraceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn replay(msg: impl Into<String>) -> Self {
        Self::Replay {
            message: msg.into(),
        }
    }
}
