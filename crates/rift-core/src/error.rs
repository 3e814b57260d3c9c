//! Error types for sync runs.

use std::path::PathBuf;

use thiserror::Error;

/// A failure tied to one path in either tree.
#[derive(Debug, Error)]
pub enum EntryError {
    /// Permission denied for a path.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path not found.
    #[error("path not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory iteration failed without an underlying I/O error.
    #[error("{}: {message}", path.display())]
    Walk { path: PathBuf, message: String },
}

impl EntryError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            std::io::ErrorKind::NotFound => Self::NotFound { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// The path the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::PermissionDenied { path, .. }
            | Self::NotFound { path, .. }
            | Self::Io { path, .. }
            | Self::Walk { path, .. } => path,
        }
    }
}

/// Errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The forward phase failed while walking, creating or copying.
    #[error("walking source: {0}")]
    Source(#[source] EntryError),

    /// The backward phase failed while enumerating the destination.
    #[error("scanning destination: {0}")]
    Destination(#[source] EntryError),

    /// An orphan could not be deleted.
    #[error("removing {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source and destination trees share a subtree.
    #[error(
        "source {} and destination {} overlap",
        source_root.display(),
        dest_root.display()
    )]
    OverlappingTrees {
        source_root: PathBuf,
        dest_root: PathBuf,
    },

    /// Source root is not a directory.
    #[error("source is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl SyncError {
    /// Wrap an I/O failure from the forward phase.
    pub fn source_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Source(EntryError::io(path, source))
    }

    /// Wrap an I/O failure from the backward phase.
    pub fn destination_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Destination(EntryError::io(path, source))
    }
}
