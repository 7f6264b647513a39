//! # bisync - Two-way folder synchronization
//!
//! Makes two folders hold the same set of files. Files present on only one
//! side are copied across; with `sync_most_recent`, files present on both
//! sides are overwritten by the more recently modified copy. Nothing is ever
//! deleted. Every run leaves a log in `.sync_logs/` inside both folders.

pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod journal;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{Direction, FileRecord, ScanResult, SyncAction, SyncError, SyncReason};
pub use scanner::IgnoreSpec;
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
