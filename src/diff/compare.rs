//! Recency comparison for files present in both roots

use crate::types::{Direction, FileRecord};

/// Decide which side, if any, should overwrite the other
///
/// Only modification times are consulted. Size is ignored: two files with
/// the same mtime are treated as the same version, and the strictly newer
/// side wins otherwise.
///
/// # Returns
/// * `Some(Direction::AToB)` - A's copy is newer
/// * `Some(Direction::BToA)` - B's copy is newer
/// * `None` - timestamps are equal, nothing to do
pub fn compare_records(a: &FileRecord, b: &FileRecord) -> Option<Direction> {
    if a.is_newer_than(b) {
        Some(Direction::AToB)
    } else if b.is_newer_than(a) {
        Some(Direction::BToA)
    } else {
        None
    }
}
