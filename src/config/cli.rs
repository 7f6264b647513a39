//! Command-line interface definition

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Two-way folder synchronization
///
/// Copies files that exist in only one of the two folders to the other.
/// With --sync_most_recent, files present in both are reconciled by
/// modification time. A log of every copy is kept in `.sync_logs/` inside
/// each folder.
#[derive(Parser, Debug, Clone)]
#[command(name = "bisync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the first folder
    #[arg(value_name = "A")]
    pub root_a: PathBuf,

    /// Path to the second folder
    #[arg(value_name = "B")]
    pub root_b: PathBuf,

    /// Overwrite the older copy of files present on both sides
    #[arg(long = "sync_most_recent")]
    pub sync_most_recent: bool,

    /// Relative paths of files or folders to skip (prefix match)
    #[arg(long = "ignore_files", value_name = "PATH", num_args = 0..)]
    pub ignore_files: Vec<String>,

    /// File extensions to skip, e.g. .o .tmp
    #[arg(long = "ignore_extensions", value_name = "EXT", num_args = 0..)]
    pub ignore_extensions: Vec<String>,

    /// Skip hidden (dot-prefixed) files and folders; use --ignore_hidden=false to sync them [default: true]
    #[arg(
        long = "ignore_hidden",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub ignore_hidden: Option<bool>,

    /// Show what would be copied without changing anything
    #[arg(long = "dry_run")]
    pub dry_run: bool,

    /// TOML file with default ignore settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose diagnostics (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}
