//! Sequential directory walker

use super::filter::IgnoreSpec;
use crate::types::{FileRecord, ScanResult, SyncError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Callback for reporting scan progress
///
/// Arguments:
/// - `files_scanned`: Total number of files scanned so far
/// - `bytes_scanned`: Total bytes scanned so far
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Scan a sync root and build a ScanResult
///
/// Walks the tree with the `ignore` crate, but with every standard filter
/// turned off: `.gitignore` and friends have no meaning here. Exclusion is
/// driven solely by `spec`, evaluated in `filter_entry` so that ignored and
/// hidden directories are never descended into.
///
/// # Errors
/// * `RootNotFound` / `RootNotDirectory` / `RootNotReadable` if the root
///   itself cannot be walked. These abort the run.
/// * Problems with individual entries below the root are logged and skipped.
pub fn scan_directory(
    root_path: &Path,
    spec: &IgnoreSpec,
    on_progress: Option<&ProgressCallback>,
) -> Result<ScanResult, SyncError> {
    validate_root(root_path)?;

    let start_time = Instant::now();
    let mut scan = ScanResult::new(root_path.to_path_buf());

    let mut scanned_count: u64 = 0;
    let mut scanned_bytes: u64 = 0;

    let filter_spec = Arc::new(spec.clone());
    let filter_root = root_path.to_path_buf();

    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let Ok(relative) = entry.path().strip_prefix(&filter_root) else {
                return true;
            };
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !filter_spec.is_excluded(relative, is_dir)
        })
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root_path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            scan.increment_dirs();
            continue;
        }

        // Symlinks are resolved so a link to a file syncs as that file's content.
        let metadata = if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(m) if m.is_file() => m,
                Ok(_) => {
                    debug!(path = %entry.path().display(), "skipping symlink to directory");
                    continue;
                }
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping broken symlink");
                    continue;
                }
            }
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "failed to read metadata");
                    continue;
                }
            }
        } else {
            debug!(path = %entry.path().display(), "skipping special file");
            continue;
        };

        let relative_path = match entry.path().strip_prefix(root_path) {
            Ok(p) => p.to_path_buf(),
            Err(_) => {
                warn!(path = %entry.path().display(), "entry is outside the scanned root");
                continue;
            }
        };

        let mtime = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "modification time unavailable");
                continue;
            }
        };

        let size = metadata.len();
        scan.insert(FileRecord::new(relative_path, size, mtime));

        scanned_count += 1;
        scanned_bytes += size;

        if let Some(callback) = on_progress {
            callback(scanned_count, scanned_bytes);
        }
    }

    scan.set_scan_duration(start_time.elapsed());
    debug!(
        root = %root_path.display(),
        files = scan.total_files,
        dirs = scan.total_dirs,
        "scan complete"
    );

    Ok(scan)
}

/// Make sure a root exists, is a directory, and can be listed
fn validate_root(root_path: &Path) -> Result<(), SyncError> {
    let path = || PathBuf::from(root_path);

    let metadata = match fs::metadata(root_path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SyncError::RootNotFound { path: path() })
        }
        Err(source) => {
            return Err(SyncError::RootNotReadable {
                path: path(),
                source,
            })
        }
    };

    if !metadata.is_dir() {
        return Err(SyncError::RootNotDirectory { path: path() });
    }

    fs::read_dir(root_path).map_err(|source| SyncError::RootNotReadable {
        path: path(),
        source,
    })?;

    Ok(())
}
