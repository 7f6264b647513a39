//! ScanResult - Files found under one sync root

use super::FileRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the scanner found under a single root
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Map: relative_path → FileRecord
    pub entries: HashMap<PathBuf, FileRecord>,

    /// Aggregate statistics
    pub total_size: u64,
    pub total_files: usize,
    pub total_dirs: usize,

    /// Scan metadata
    pub scan_duration: Duration,
    pub root_path: PathBuf,
}

impl ScanResult {
    /// Create a new empty ScanResult
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            entries: HashMap::new(),
            total_size: 0,
            total_files: 0,
            total_dirs: 0,
            scan_duration: Duration::from_secs(0),
            root_path,
        }
    }

    /// Insert a record, keyed by its relative path
    ///
    /// Re-inserting an existing path replaces the record and adjusts the totals.
    pub fn insert(&mut self, record: FileRecord) {
        if let Some(old) = self.entries.get(&record.path) {
            self.total_size = self.total_size.saturating_sub(old.size);
            self.total_files = self.total_files.saturating_sub(1);
        }

        self.total_size += record.size;
        self.total_files += 1;
        self.entries.insert(record.path.clone(), record);
    }

    /// Get a record by relative path
    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    /// Check if a relative path exists in the scan
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator over all (path, record) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileRecord)> {
        self.entries.iter()
    }

    /// Iterator over just the relative paths
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }

    /// Count one traversed directory
    pub fn increment_dirs(&mut self) {
        self.total_dirs += 1;
    }
}
