//! Error types for sequence operations

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("Cannot parse '{path}' as a sequence frame: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Access denied: path '{path}' is not within allowed directories")]
    AccessDenied { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error on '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SequenceError {
    pub fn parse(path: &Path, reason: impl Into<String>) -> Self {
        SequenceError::Parse {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        SequenceError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        SequenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// Hosts that speak string errors (command layers, FFI) can use `?` directly
impl From<SequenceError> for String {
    fn from(error: SequenceError) -> Self {
        error.to_string()
    }
}

pub type Result<T> = std::result::Result<T, SequenceError>;
