//! Error types for host and session operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::group::GroupKey;

/// Errors reported by an [`AssetHost`](crate::AssetHost).
#[derive(Debug, Error)]
pub enum HostError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The rename target already exists on disk.
    #[error("Destination already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Project root is not a directory.
    #[error("Project root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl HostError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a free-form host error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Errors returned by session commands.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The group key is not present in the scanned groups.
    #[error("Unknown group: {key}")]
    UnknownGroup { key: GroupKey },

    /// The member index is out of range for the group.
    #[error("Group {key} has no member at index {index}")]
    UnknownMember { key: GroupKey, index: usize },

    /// No member of the group has this path.
    #[error("Group {key} has no member {path}")]
    UnknownPath { key: GroupKey, path: String },

    /// Rename was requested but no member of the group is selected.
    #[error("No members selected in {key}")]
    NothingSelected { key: GroupKey },

    /// The requested base name cannot be used as a filename.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A delegated host call failed.
    #[error("Host operation failed: {0}")]
    Host(#[from] HostError),
}

impl SessionError {
    /// Whether the error came from the host rather than from validation.
    pub fn is_host_failure(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}
