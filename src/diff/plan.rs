//! SyncAction plan generation

use crate::diff::compare_records;
use crate::types::{Direction, ScanResult, SyncAction, SyncReason};
use crate::Config;

/// Diff plan containing actions and statistics
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiffPlan {
    /// Copies to perform, in execution order
    pub actions: Vec<SyncAction>,

    /// Aggregate statistics about the plan
    pub stats: PlanStats,
}

impl DiffPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action to the plan and update statistics
    pub fn add_action(&mut self, action: SyncAction) {
        match (action.direction(), action.reason()) {
            (Direction::AToB, SyncReason::New) => self.stats.new_a_to_b += 1,
            (Direction::BToA, SyncReason::New) => self.stats.new_b_to_a += 1,
            (Direction::AToB, SyncReason::MoreRecent) => self.stats.recent_a_to_b += 1,
            (Direction::BToA, SyncReason::MoreRecent) => self.stats.recent_b_to_a += 1,
        }
        self.stats.total_files += 1;
        self.stats.total_bytes += action.entry().size;

        self.actions.push(action);
    }

    /// Order actions for readable output
    ///
    /// `new` copies come first, then `more-recent` ones; within each group
    /// A→B precedes B→A, and paths are sorted.
    pub fn sort(&mut self) {
        self.actions.sort_by(|x, y| {
            (x.reason(), x.direction(), x.path()).cmp(&(y.reason(), y.direction(), y.path()))
        });
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Statistics about a diff plan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanStats {
    /// Total number of files to copy
    pub total_files: usize,

    /// Total bytes to copy
    pub total_bytes: u64,

    /// Files only in A
    pub new_a_to_b: usize,

    /// Files only in B
    pub new_b_to_a: usize,

    /// Files in both, A newer
    pub recent_a_to_b: usize,

    /// Files in both, B newer
    pub recent_b_to_a: usize,

    /// Files present in both roots that need nothing
    pub unchanged: usize,
}

/// Generate a sync plan by comparing the scans of both roots
///
/// 1. Paths only in A are copied A→B (`new`).
/// 2. Paths only in B are copied B→A (`new`).
/// 3. Paths in both are reconciled by mtime when `sync_most_recent` is set;
///    equal timestamps, or the flag being off, leave them alone.
///
/// # Example
/// ```
/// use bisync::diff::generate_sync_plan;
/// use bisync::types::{FileRecord, ScanResult};
/// use bisync::Config;
/// use std::path::PathBuf;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let mut a = ScanResult::new(PathBuf::from("a"));
/// let b = ScanResult::new(PathBuf::from("b"));
/// a.insert(FileRecord::new(
///     PathBuf::from("new.txt"),
///     4,
///     UNIX_EPOCH + Duration::from_secs(1_000),
/// ));
///
/// let plan = generate_sync_plan(&a, &b, &Config::default());
/// assert_eq!(plan.stats.new_a_to_b, 1);
/// ```
pub fn generate_sync_plan(scan_a: &ScanResult, scan_b: &ScanResult, config: &Config) -> DiffPlan {
    let mut plan = DiffPlan::new();

    for (path, record_a) in scan_a.iter() {
        match scan_b.get(path) {
            None => plan.add_action(SyncAction::new(
                Direction::AToB,
                record_a.clone(),
                SyncReason::New,
            )),
            Some(record_b) => {
                let newer = if config.sync_most_recent {
                    compare_records(record_a, record_b)
                } else {
                    None
                };

                match newer {
                    Some(Direction::AToB) => plan.add_action(SyncAction::new(
                        Direction::AToB,
                        record_a.clone(),
                        SyncReason::MoreRecent,
                    )),
                    Some(Direction::BToA) => plan.add_action(SyncAction::new(
                        Direction::BToA,
                        record_b.clone(),
                        SyncReason::MoreRecent,
                    )),
                    None => plan.stats.unchanged += 1,
                }
            }
        }
    }

    for (path, record_b) in scan_b.iter() {
        if !scan_a.contains(path) {
            plan.add_action(SyncAction::new(
                Direction::BToA,
                record_b.clone(),
                SyncReason::New,
            ));
        }
    }

    plan.sort();

    plan
}
