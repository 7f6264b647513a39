//! Path filtering rules applied while walking a root
//!
//! Rules are checked per entry during traversal so that excluded directories
//! are pruned instead of being walked and discarded afterwards.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Name of the per-root directory holding sync logs
///
/// Always excluded from scans, even with hidden filtering disabled.
pub const JOURNAL_DIR_NAME: &str = ".sync_logs";

/// Suffix of the temp file a copy writes before renaming into place
pub const PART_SUFFIX: &str = ".part";

/// True for names of the form `.<name>.part` left by an interrupted copy
///
/// Always excluded, like the journal directory.
pub fn is_partial_copy_name(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    bytes.len() > 1 + PART_SUFFIX.len()
        && bytes.starts_with(b".")
        && bytes.ends_with(PART_SUFFIX.as_bytes())
}

/// Exclusion rules for one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSpec {
    /// Relative paths (files or directories) to skip, matched by component prefix
    ignore_files: Vec<PathBuf>,

    /// File name suffixes to skip, each starting with `.`
    ignore_extensions: Vec<String>,

    /// Skip any entry whose name starts with `.`
    ignore_hidden: bool,
}

impl Default for IgnoreSpec {
    fn default() -> Self {
        Self {
            ignore_files: Vec::new(),
            ignore_extensions: Vec::new(),
            ignore_hidden: true,
        }
    }
}

impl IgnoreSpec {
    /// Build a spec from raw user input
    ///
    /// `ignore_files` entries lose any leading `./` and trailing `/`;
    /// `ignore_extensions` entries gain a leading `.` if missing. Empty
    /// entries are dropped.
    pub fn new<F, E>(ignore_files: F, ignore_extensions: E, ignore_hidden: bool) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            ignore_files: ignore_files
                .into_iter()
                .filter_map(|entry| normalize_ignore_file(entry.as_ref()))
                .collect(),
            ignore_extensions: ignore_extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
            ignore_hidden,
        }
    }

    pub fn ignore_files(&self) -> &[PathBuf] {
        &self.ignore_files
    }

    pub fn ignore_extensions(&self) -> &[String] {
        &self.ignore_extensions
    }

    pub fn ignore_hidden(&self) -> bool {
        self.ignore_hidden
    }

    /// Decide whether a root-relative path should be skipped
    ///
    /// `is_dir` disables extension matching, which only applies to files.
    pub fn is_excluded(&self, relative_path: &Path, is_dir: bool) -> bool {
        if relative_path.as_os_str().is_empty() {
            return false;
        }

        if relative_path.starts_with(JOURNAL_DIR_NAME) {
            return true;
        }

        if self.ignore_hidden && has_hidden_component(relative_path) {
            return true;
        }

        if self
            .ignore_files
            .iter()
            .any(|ignored| relative_path.starts_with(ignored))
        {
            return true;
        }

        if !is_dir {
            if let Some(name) = relative_path.file_name() {
                if is_partial_copy_name(name) {
                    return true;
                }

                // Compared as bytes so names that are not valid UTF-8 still match.
                let name = name.as_encoded_bytes();
                if self
                    .ignore_extensions
                    .iter()
                    .any(|ext| name.len() > ext.len() && name.ends_with(ext.as_bytes()))
                {
                    return true;
                }
            }
        }

        false
    }
}

fn has_hidden_component(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

fn normalize_ignore_file(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    let without_dot = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let without_slash = without_dot.trim_end_matches(['/', '\\']);
    if without_slash.is_empty() || without_slash == "." {
        return None;
    }
    Some(PathBuf::from(without_slash))
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    if trimmed.starts_with('.') {
        Some(trimmed.to_string())
    } else {
        Some(format!(".{trimmed}"))
    }
}
