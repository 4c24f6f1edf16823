use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure returned by a [`FilesystemService`](super::FilesystemService) operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{}: no such file or directory", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: permission denied", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: {message}", .path.display())]
    Io {
        path: PathBuf,
        kind: io::ErrorKind,
        message: String,
    },

    #[error("invalid temp dir pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

impl FsError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        FsError::NotFound { path: path.into() }
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        FsError::PermissionDenied { path: path.into() }
    }

    /// Generic I/O failure with a free-form message, e.g. "disk full".
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FsError::Io {
            path: path.into(),
            kind: io::ErrorKind::Other,
            message: message.into(),
        }
    }

    /// Classifies a host I/O error against the path it was raised for.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::not_found(path),
            io::ErrorKind::PermissionDenied => FsError::permission_denied(path),
            kind => FsError::Io {
                path: path.to_path_buf(),
                kind,
                message: err.to_string(),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }
}
