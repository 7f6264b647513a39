//! Error types for bisync

use std::path::PathBuf;
use thiserror::Error;

/// Error types for bisync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sync root does not exist
    #[error("Root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Sync root exists but is a file or something else
    #[error("Root is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    /// Sync root cannot be listed
    #[error("Root not readable: {path}: {source}")]
    RootNotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file disappeared between scan and copy
    #[error("Source file vanished: {path}")]
    SourceMissing { path: PathBuf },

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Destination filesystem ran out of space
    #[error("Disk full while writing {path}")]
    DiskFull { path: PathBuf },

    /// Any other failure while copying a single file
    #[error("Copy failed for {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sync journal could not be written
    #[error("Failed to write sync log {path}: {source}")]
    JournalWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Errors that abort the run before anything is copied
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Config(_)
                | SyncError::RootNotFound { .. }
                | SyncError::RootNotDirectory { .. }
                | SyncError::RootNotReadable { .. }
        )
    }

    /// Per-file failures the executor records and skips past
    pub fn is_copy_failure(&self) -> bool {
        matches!(
            self,
            SyncError::Io(_)
                | SyncError::SourceMissing { .. }
                | SyncError::PermissionDenied { .. }
                | SyncError::DiskFull { .. }
                | SyncError::CopyFailed { .. }
        )
    }

    pub fn is_permission_error(&self) -> bool {
        matches!(self, SyncError::PermissionDenied { .. })
    }

    pub fn is_disk_space_error(&self) -> bool {
        matches!(self, SyncError::DiskFull { .. })
    }
}
