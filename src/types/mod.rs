//! Core type definitions for bisync

mod action;
mod entry;
mod error;
mod tree;

pub use action::{Direction, SyncAction, SyncReason};
pub use entry::FileRecord;
pub use error::SyncError;
pub use tree::ScanResult;
