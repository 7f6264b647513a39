//! Configuration management
//!
//! Settings come from the command line, optionally layered over a TOML file
//! given with `--config`. Everything is resolved into one [`Config`] that is
//! passed explicitly to the scanner, diff engine, and executor.

mod cli;

pub use cli::Cli;

use crate::scanner::IgnoreSpec;
use crate::types::SyncError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration for one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// First sync root
    pub root_a: PathBuf,

    /// Second sync root
    pub root_b: PathBuf,

    /// Overwrite the older side of files present in both roots
    pub sync_most_recent: bool,

    /// Relative paths to skip (prefix match)
    pub ignore_files: Vec<String>,

    /// Extensions to skip
    pub ignore_extensions: Vec<String>,

    /// Skip dot-prefixed entries
    pub ignore_hidden: bool,

    /// Dry run (show plan, don't execute)
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_a: PathBuf::new(),
            root_b: PathBuf::new(),
            sync_most_recent: false,
            ignore_files: Vec::new(),
            ignore_extensions: Vec::new(),
            ignore_hidden: true,
            dry_run: false,
        }
    }
}

impl Config {
    /// Build a configuration for two roots with default settings
    pub fn new(root_a: impl Into<PathBuf>, root_b: impl Into<PathBuf>) -> Self {
        Self {
            root_a: root_a.into(),
            root_b: root_b.into(),
            ..Self::default()
        }
    }

    /// Exclusion rules shared by both scans
    pub fn ignore_spec(&self) -> IgnoreSpec {
        IgnoreSpec::new(
            &self.ignore_files,
            &self.ignore_extensions,
            self.ignore_hidden,
        )
    }

    /// Validate configuration
    ///
    /// Both roots must be existing directories, and neither may contain the
    /// other: a nested pair would copy the inner tree into itself on every run.
    pub fn validate(&self) -> Result<(), SyncError> {
        for root in [&self.root_a, &self.root_b] {
            if !root.exists() {
                return Err(SyncError::RootNotFound { path: root.clone() });
            }
            if !root.is_dir() {
                return Err(SyncError::RootNotDirectory { path: root.clone() });
            }
        }

        let a = canonical(&self.root_a)?;
        let b = canonical(&self.root_b)?;

        if a == b {
            return Err(SyncError::Config(
                "Folder A and folder B cannot be the same".to_string(),
            ));
        }

        if a.starts_with(&b) || b.starts_with(&a) {
            return Err(SyncError::Config(format!(
                "Folders cannot be nested inside each other: {} and {}",
                self.root_a.display(),
                self.root_b.display()
            )));
        }

        Ok(())
    }

    /// Combine command-line arguments with an optional config file
    ///
    /// List settings are concatenated (file first). An explicit
    /// `--ignore_hidden` wins over the file; `sync_most_recent` is enabled
    /// if either source enables it.
    pub fn from_sources(cli: Cli, file: FileConfig) -> Self {
        let mut ignore_files = file.ignore_files;
        ignore_files.extend(cli.ignore_files);

        let mut ignore_extensions = file.ignore_extensions;
        ignore_extensions.extend(cli.ignore_extensions);

        Self {
            root_a: cli.root_a,
            root_b: cli.root_b,
            sync_most_recent: cli.sync_most_recent || file.sync_most_recent,
            ignore_files,
            ignore_extensions,
            ignore_hidden: cli.ignore_hidden.or(file.ignore_hidden).unwrap_or(true),
            dry_run: cli.dry_run,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let config = Config::from_sources(cli, file);
        config.validate()?;
        Ok(config)
    }
}

/// Settings accepted in a `--config` TOML file
///
/// ```toml
/// sync_most_recent = true
/// ignore_files = ["build/", "notes/scratch.txt"]
/// ignore_extensions = [".o", ".tmp"]
/// ignore_hidden = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub sync_most_recent: bool,
    pub ignore_files: Vec<String>,
    pub ignore_extensions: Vec<String>,
    pub ignore_hidden: Option<bool>,
}

impl FileConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SyncError::Config(msg) => {
                SyncError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SyncError> {
        toml::from_str(content)
            .map_err(|e| SyncError::Config(format!("Invalid config file: {}", e)))
    }
}

fn canonical(path: &Path) -> Result<PathBuf, SyncError> {
    path.canonicalize()
        .map_err(|source| SyncError::RootNotReadable {
            path: path.to_path_buf(),
            source,
        })
}
