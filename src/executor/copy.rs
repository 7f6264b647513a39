//! Atomic file copy implementation

use crate::scanner::PART_SUFFIX;
use crate::types::SyncError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Create missing parent directories of `dest`
/// 2. Stream `src` into a hidden temp file next to `dest`
/// 3. Flush to disk, copy permissions and mtime
/// 4. Rename the temp file over `dest`
///
/// Preserving the mtime is best-effort: failure is logged and the copy
/// still succeeds. The temp file is removed if any other step fails.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SyncError)` - `SourceMissing`, `PermissionDenied`, `DiskFull` or `CopyFailed`
///
/// # Example
/// ```no_run
/// use bisync::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("a/notes.txt"), Path::new("b/notes.txt"))?;
/// # Ok::<(), bisync::types::SyncError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| map_copy_error(parent, e))?;
    }

    let mut src_file = File::open(src).map_err(|e| map_source_error(src, e))?;
    let src_metadata = src_file.metadata().map_err(|e| map_source_error(src, e))?;

    let part_path = part_path_for(dest);
    let result = write_part(&mut src_file, &part_path, &src_metadata)
        .and_then(|bytes| fs::rename(&part_path, dest).map(|_| bytes));

    match result {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let _ = fs::remove_file(&part_path);
            Err(map_copy_error(dest, e))
        }
    }
}

fn write_part(src_file: &mut File, part_path: &Path, src_metadata: &fs::Metadata) -> io::Result<u64> {
    let mut part_file = File::create(part_path)?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        part_file.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    fs::set_permissions(part_path, src_metadata.permissions())?;

    match src_metadata.modified() {
        Ok(mtime) => {
            let filetime_mtime = filetime::FileTime::from_system_time(mtime);
            if let Err(e) = filetime::set_file_mtime(part_path, filetime_mtime) {
                warn!(path = %part_path.display(), error = %e, "could not preserve modification time");
            }
        }
        Err(e) => {
            warn!(path = %part_path.display(), error = %e, "source modification time unavailable");
        }
    }

    Ok(total_bytes)
}

/// Hidden sibling used as the write target before the final rename
///
/// Scans skip this name pattern, so a leftover from an interrupted run is
/// never synced.
pub(crate) fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file_name) = dest.file_name() {
        name.push(file_name);
    }
    name.push(PART_SUFFIX);
    dest.with_file_name(name)
}

fn map_source_error(path: &Path, error: io::Error) -> SyncError {
    if error.kind() == ErrorKind::NotFound {
        SyncError::SourceMissing {
            path: path.to_path_buf(),
        }
    } else {
        map_copy_error(path, error)
    }
}

fn map_copy_error(path: &Path, error: io::Error) -> SyncError {
    if matches!(error.kind(), ErrorKind::PermissionDenied) {
        SyncError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else if matches!(error.raw_os_error(), Some(28 | 122)) {
        // ENOSPC / EDQUOT
        SyncError::DiskFull {
            path: path.to_path_buf(),
        }
    } else {
        SyncError::CopyFailed {
            path: path.to_path_buf(),
            source: error,
        }
    }
}
