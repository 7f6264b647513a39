//! Executor module for file operations

pub mod copy;

use crate::diff::DiffPlan;
use crate::types::{Direction, SyncAction, SyncError, SyncReason};
use crate::Config;
use std::path::PathBuf;

pub use copy::copy_file_atomic;

/// Execution progress statistics for a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Number of actions in the input plan.
    pub total_actions: usize,
    /// Number of successfully copied files.
    pub completed_actions: usize,
    /// Number of failed copies.
    pub failed_actions: usize,
    /// Aggregate copied bytes.
    pub bytes_copied: u64,
}

/// Events emitted while executing a plan.
#[derive(Debug)]
pub enum ExecutionEvent<'a> {
    /// Copy started.
    ActionStart {
        index: usize,
        total: usize,
        action: &'a SyncAction,
    },
    /// Copy succeeded.
    ActionSuccess {
        index: usize,
        total: usize,
        action: &'a SyncAction,
        bytes_copied: u64,
    },
    /// Copy failed but the executor moved on.
    ActionError {
        index: usize,
        total: usize,
        action: &'a SyncAction,
        error: &'a SyncError,
    },
    /// Plan execution completed (with or without errors).
    Complete { stats: ExecutionStats },
}

/// Optional callback used to receive execution events.
pub type ExecutionCallback = dyn Fn(&ExecutionEvent<'_>) + Send + Sync;

/// Outcome of a single executed action, kept for the run summary
#[derive(Debug)]
pub struct ActionFailure {
    pub path: PathBuf,
    pub direction: Direction,
    pub reason: SyncReason,
    pub error: SyncError,
}

/// Execute a sync plan
///
/// Actions run sequentially in plan order. A failed copy is reported through
/// `on_event` and collected in the returned failures; execution always
/// continues with the next action, and files already copied stay copied.
pub fn execute_plan(
    plan: &DiffPlan,
    config: &Config,
    on_event: Option<&ExecutionCallback>,
) -> (ExecutionStats, Vec<ActionFailure>) {
    let mut stats = ExecutionStats {
        total_actions: plan.actions.len(),
        ..Default::default()
    };
    let mut failures = Vec::new();

    for (idx, action) in plan.actions.iter().enumerate() {
        let index = idx + 1;
        emit_event(
            on_event,
            ExecutionEvent::ActionStart {
                index,
                total: stats.total_actions,
                action,
            },
        );

        match execute_action(action, config) {
            Ok(bytes) => {
                stats.completed_actions += 1;
                stats.bytes_copied += bytes;

                emit_event(
                    on_event,
                    ExecutionEvent::ActionSuccess {
                        index,
                        total: stats.total_actions,
                        action,
                        bytes_copied: bytes,
                    },
                );
            }
            Err(error) => {
                stats.failed_actions += 1;

                emit_event(
                    on_event,
                    ExecutionEvent::ActionError {
                        index,
                        total: stats.total_actions,
                        action,
                        error: &error,
                    },
                );

                failures.push(ActionFailure {
                    path: action.path().clone(),
                    direction: action.direction(),
                    reason: action.reason(),
                    error,
                });
            }
        }
    }

    emit_event(
        on_event,
        ExecutionEvent::Complete {
            stats: stats.clone(),
        },
    );

    (stats, failures)
}

fn execute_action(action: &SyncAction, config: &Config) -> Result<u64, SyncError> {
    let (src_root, dest_root) = action
        .direction()
        .endpoints(&config.root_a, &config.root_b);
    let src_path = src_root.join(action.path());
    let dest_path = dest_root.join(action.path());
    copy_file_atomic(&src_path, &dest_path)
}

fn emit_event(on_event: Option<&ExecutionCallback>, event: ExecutionEvent<'_>) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
