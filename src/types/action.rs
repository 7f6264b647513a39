//! SyncAction - Copies decided by the diff engine

use super::FileRecord;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a file is being copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyncReason {
    /// Missing on the destination side
    New,

    /// Present on both sides, source modified later
    MoreRecent,
}

impl SyncReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncReason::New => "new",
            SyncReason::MoreRecent => "more-recent",
        }
    }
}

impl fmt::Display for SyncReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way a copy crosses the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    AToB,
    BToA,
}

impl Direction {
    /// Short label used in the journal and progress output
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::AToB => "A→B",
            Direction::BToA => "B→A",
        }
    }

    /// Resolve (source root, destination root) for this direction
    pub fn endpoints<'a>(&self, root_a: &'a Path, root_b: &'a Path) -> (&'a Path, &'a Path) {
        match self {
            Direction::AToB => (root_a, root_b),
            Direction::BToA => (root_b, root_a),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arrow())
    }
}

/// Copy action determined by the diff engine
///
/// The carried record describes the file on the source side of the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy from root A into root B
    CopyAToB { entry: FileRecord, reason: SyncReason },

    /// Copy from root B into root A
    CopyBToA { entry: FileRecord, reason: SyncReason },
}

impl SyncAction {
    pub fn new(direction: Direction, entry: FileRecord, reason: SyncReason) -> Self {
        match direction {
            Direction::AToB => SyncAction::CopyAToB { entry, reason },
            Direction::BToA => SyncAction::CopyBToA { entry, reason },
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            SyncAction::CopyAToB { .. } => Direction::AToB,
            SyncAction::CopyBToA { .. } => Direction::BToA,
        }
    }

    pub fn entry(&self) -> &FileRecord {
        match self {
            SyncAction::CopyAToB { entry, .. } | SyncAction::CopyBToA { entry, .. } => entry,
        }
    }

    pub fn reason(&self) -> SyncReason {
        match self {
            SyncAction::CopyAToB { reason, .. } | SyncAction::CopyBToA { reason, .. } => *reason,
        }
    }

    /// Relative path of the file being copied
    pub fn path(&self) -> &PathBuf {
        &self.entry().path
    }

    pub fn is_new(&self) -> bool {
        self.reason() == SyncReason::New
    }

    pub fn is_more_recent(&self) -> bool {
        self.reason() == SyncReason::MoreRecent
    }
}
