//! FileRecord - A single file seen under one sync root

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// A file discovered by the scanner
///
/// `path` is relative to the root it was found under and is the identity key
/// used to match the same logical file across both roots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    /// Relative path from sync root
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,
}

impl FileRecord {
    /// Create a new FileRecord
    pub fn new(path: PathBuf, size: u64, mtime: SystemTime) -> Self {
        Self { path, size, mtime }
    }

    /// True if this record was modified strictly after `other`
    pub fn is_newer_than(&self, other: &FileRecord) -> bool {
        self.mtime > other.mtime
    }
}
