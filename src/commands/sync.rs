//! Main sync command

use crate::diff::{generate_sync_plan, DiffPlan, PlanStats};
use crate::executor::{execute_plan, ActionFailure, ExecutionEvent, ExecutionStats};
use crate::journal::{JournalEntry, Outcome, SyncJournal};
use crate::scanner::{scan_directory, IgnoreSpec, ProgressCallback};
use crate::types::{ScanResult, SyncError};
use crate::ui::ProgressReporter;
use crate::Config;
use chrono::Local;
use console::style;
use indicatif::HumanBytes;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::info;

/// What a finished run did
#[derive(Debug)]
pub struct RunSummary {
    /// Planned copies
    pub plan: PlanStats,
    /// Executed copies (all zero for a dry run)
    pub execution: ExecutionStats,
    /// Copies that failed and were skipped
    pub failures: Vec<ActionFailure>,
    /// Journal files written for this run
    pub journal_paths: Vec<PathBuf>,
    /// Journal errors reported during the run
    pub journal_failures: usize,
    pub dry_run: bool,
}

impl RunSummary {
    /// True when every planned copy succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run the sync operation
///
/// Scans both roots, plans the copies, executes them while journaling each
/// outcome, and prints a summary. Only an unusable root aborts the run;
/// individual copy failures are reported in the returned summary.
pub fn run(config: Config) -> Result<RunSummary, SyncError> {
    let run_started = Instant::now();
    let started_at = Local::now();
    let spec = config.ignore_spec();
    let reporter = Arc::new(Mutex::new(ProgressReporter::new()));

    info!(
        a = %config.root_a.display(),
        b = %config.root_b.display(),
        sync_most_recent = config.sync_most_recent,
        "starting sync"
    );

    let scan_a = scan_root("A", &config.root_a, &spec, &reporter)?;
    let scan_b = scan_root("B", &config.root_b, &spec, &reporter)?;
    if let Ok(progress) = reporter.lock() {
        progress.end_scans();
    }

    let plan = generate_sync_plan(&scan_a, &scan_b, &config);
    print_plan_summary(&plan);

    if config.dry_run {
        print_dry_run_actions(&plan);
        println!("Dry-run mode: no changes were made.");
        return Ok(RunSummary {
            plan: plan.stats,
            execution: ExecutionStats::default(),
            failures: Vec::new(),
            journal_paths: Vec::new(),
            journal_failures: 0,
            dry_run: true,
        });
    }

    let journal = Arc::new(Mutex::new(SyncJournal::open(
        &[config.root_a.as_path(), config.root_b.as_path()],
        started_at,
    )));
    if let Ok(mut log) = journal.lock() {
        log.write_header(&config);
    }

    let (stats, failures) = if plan.is_empty() {
        println!("Nothing to sync.");
        (ExecutionStats::default(), Vec::new())
    } else {
        execute_with_progress(&plan, &config, &reporter, &journal)
    };

    let scanned_files = scan_a.total_files + scan_b.total_files;
    let (journal_paths, journal_failures) = match journal.lock() {
        Ok(mut log) => {
            log.write_footer(scanned_files, &stats, run_started.elapsed());
            (log.paths(), log.failures().len())
        }
        Err(_) => (Vec::new(), 0),
    };

    if !failures.is_empty() {
        let records: Vec<ErrorRecord> = failures.iter().map(ErrorRecord::from_failure).collect();
        println!("{}", format_error_summary(&records));
    }
    for path in &journal_paths {
        println!("Log saved to {}", path.display());
    }

    info!(
        copied = stats.completed_actions,
        failed = stats.failed_actions,
        elapsed_ms = run_started.elapsed().as_millis() as u64,
        "sync finished"
    );

    Ok(RunSummary {
        plan: plan.stats,
        execution: stats,
        failures,
        journal_paths,
        journal_failures,
        dry_run: false,
    })
}

fn scan_root(
    label: &'static str,
    root: &Path,
    spec: &IgnoreSpec,
    reporter: &Arc<Mutex<ProgressReporter>>,
) -> Result<ScanResult, SyncError> {
    if let Ok(progress) = reporter.lock() {
        progress.start_scan(label);
    }
    let on_progress: ProgressCallback = {
        let reporter = Arc::clone(reporter);
        Box::new(move |files: u64, bytes: u64| {
            if let Ok(progress) = reporter.lock() {
                progress.update_scan(label, files, bytes);
            }
        })
    };

    let scan = scan_directory(root, spec, Some(&on_progress))?;
    if let Ok(progress) = reporter.lock() {
        progress.finish_scan(label, scan.total_files, scan.total_size);
    }
    Ok(scan)
}

fn execute_with_progress(
    plan: &DiffPlan,
    config: &Config,
    reporter: &Arc<Mutex<ProgressReporter>>,
    journal: &Arc<Mutex<SyncJournal>>,
) -> (ExecutionStats, Vec<ActionFailure>) {
    if let Ok(mut progress) = reporter.lock() {
        progress.start_transfer(plan.actions.len() as u64);
    }

    let progress_cb = {
        let reporter = Arc::clone(reporter);
        let journal = Arc::clone(journal);
        move |event: &ExecutionEvent<'_>| match event {
            ExecutionEvent::ActionStart { action, .. } => {
                if let Ok(progress) = reporter.lock() {
                    progress.set_current_file(action.direction(), action.path());
                }
            }
            ExecutionEvent::ActionSuccess {
                action,
                bytes_copied,
                ..
            } => {
                if let Ok(mut progress) = reporter.lock() {
                    progress.complete_transfer_file(*bytes_copied);
                }
                if let Ok(mut log) = journal.lock() {
                    log.record(&JournalEntry {
                        timestamp: Local::now(),
                        direction: action.direction(),
                        path: action.path(),
                        reason: action.reason(),
                        outcome: Outcome::Success,
                    });
                }
            }
            ExecutionEvent::ActionError { action, error, .. } => {
                let message = error.to_string();
                if let Ok(progress) = reporter.lock() {
                    progress.transfer_error(action.direction(), action.path(), &message);
                }
                if let Ok(mut log) = journal.lock() {
                    log.record(&JournalEntry {
                        timestamp: Local::now(),
                        direction: action.direction(),
                        path: action.path(),
                        reason: action.reason(),
                        outcome: Outcome::Failure(&message),
                    });
                }
            }
            ExecutionEvent::Complete { stats } => {
                if let Ok(progress) = reporter.lock() {
                    progress.finish_transfer(stats.completed_actions, stats.failed_actions);
                }
            }
        }
    };

    execute_plan(plan, config, Some(&progress_cb))
}

fn print_plan_summary(plan: &DiffPlan) {
    println!("{}", format_plan_preview(plan));
}

fn format_plan_preview(plan: &DiffPlan) -> String {
    let stats = &plan.stats;
    format!(
        "{}\n  New A→B: {}  New B→A: {}  Newer A→B: {}  Newer B→A: {}  Unchanged: {}\n  Total bytes to copy: {}",
        style("Plan:").bold(),
        stats.new_a_to_b,
        stats.new_b_to_a,
        stats.recent_a_to_b,
        stats.recent_b_to_a,
        stats.unchanged,
        HumanBytes(stats.total_bytes)
    )
}

fn print_dry_run_actions(plan: &DiffPlan) {
    println!("{}", format_dry_run_actions(plan));
}

fn format_dry_run_actions(plan: &DiffPlan) -> String {
    if plan.actions.is_empty() {
        return "Dry-run actions:\n  (no planned actions)".to_string();
    }

    let mut lines = Vec::with_capacity(plan.actions.len() + 1);
    lines.push("Dry-run actions:".to_string());
    for action in &plan.actions {
        let verb = if action.is_new() { "COPY" } else { "UPDATE" };
        lines.push(format!(
            "  {:<8}{}  {}",
            verb,
            action.direction(),
            action.path().display()
        ));
    }
    lines.join("\n")
}

#[derive(Debug)]
struct ErrorRecord {
    kind: &'static str,
    path: PathBuf,
    message: String,
    suggestion: Option<String>,
}

impl ErrorRecord {
    fn new(path: &Path, error: &SyncError) -> Self {
        let (message, suggestion) = humanize_error(error);
        Self {
            kind: error_kind_label(error),
            path: path.to_path_buf(),
            message,
            suggestion,
        }
    }

    fn from_failure(failure: &ActionFailure) -> Self {
        Self::new(&failure.path, &failure.error)
    }
}

fn humanize_error(error: &SyncError) -> (String, Option<String>) {
    match error {
        SyncError::SourceMissing { .. } => (
            "Source file disappeared before it could be copied".to_string(),
            Some("Re-run the sync once the folder has stopped changing.".to_string()),
        ),
        SyncError::PermissionDenied { .. } => (
            "Permission denied while accessing file".to_string(),
            Some("Check file permissions or run with a user that has access.".to_string()),
        ),
        SyncError::DiskFull { .. } => (
            "Not enough disk space to complete operation".to_string(),
            Some("Free disk space on the receiving side and retry.".to_string()),
        ),
        SyncError::CopyFailed { source, .. } | SyncError::Io(source) => match source.kind() {
            ErrorKind::AlreadyExists => type_conflict(),
            // ENOTDIR / EISDIR
            _ if matches!(source.raw_os_error(), Some(20) | Some(21)) => type_conflict(),
            _ => (
                format!("I/O operation failed: {}", source),
                Some(
                    "Retry the sync. If this keeps happening, check disk health and permissions."
                        .to_string(),
                ),
            ),
        },
        SyncError::JournalWrite { .. } => (error.to_string(), None),
        SyncError::Config(msg) => (msg.clone(), None),
        SyncError::RootNotFound { .. }
        | SyncError::RootNotDirectory { .. }
        | SyncError::RootNotReadable { .. } => (error.to_string(), None),
    }
}

fn type_conflict() -> (String, Option<String>) {
    (
        "A file and a folder share the same path on the two sides".to_string(),
        Some("Rename one of them, then retry.".to_string()),
    )
}

fn error_kind_label(error: &SyncError) -> &'static str {
    match error {
        SyncError::Io(_) | SyncError::CopyFailed { .. } => "I/O error",
        SyncError::Config(_) => "Configuration error",
        SyncError::RootNotFound { .. }
        | SyncError::RootNotDirectory { .. }
        | SyncError::RootNotReadable { .. } => "Root error",
        SyncError::SourceMissing { .. } => "Source missing",
        SyncError::PermissionDenied { .. } => "Permission denied",
        SyncError::DiskFull { .. } => "Disk full",
        SyncError::JournalWrite { .. } => "Log error",
    }
}

fn format_error_summary(records: &[ErrorRecord]) -> String {
    let mut groups: BTreeMap<&'static str, Vec<&ErrorRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.kind).or_default().push(record);
    }

    let mut lines = Vec::new();
    lines.push(format!("{}", style("Error summary:").red().bold()));
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for record in items.iter().take(3) {
            lines.push(format!("    - {}", record.message));
            lines.push(format!("      Path: {}", record.path.display()));
            if let Some(suggestion) = &record.suggestion {
                lines.push(format!("      Try: {}", suggestion));
            }
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, FileRecord, SyncAction, SyncReason};
    use std::time::{Duration, UNIX_EPOCH};

    fn action(direction: Direction, path: &str, size: u64, reason: SyncReason) -> SyncAction {
        SyncAction::new(
            direction,
            FileRecord::new(
                PathBuf::from(path),
                size,
                UNIX_EPOCH + Duration::from_secs(1_000),
            ),
            reason,
        )
    }

    #[test]
    fn test_format_plan_preview_contains_counts() {
        let mut plan = DiffPlan::new();
        plan.add_action(action(Direction::AToB, "a.txt", 1024, SyncReason::New));
        plan.add_action(action(Direction::BToA, "b.txt", 1024, SyncReason::New));
        plan.add_action(action(Direction::BToA, "c.txt", 2048, SyncReason::MoreRecent));

        let preview = format_plan_preview(&plan);
        assert!(preview.contains("New A→B: 1"));
        assert!(preview.contains("New B→A: 1"));
        assert!(preview.contains("Newer A→B: 0"));
        assert!(preview.contains("Newer B→A: 1"));
        assert!(preview.contains("KiB"), "expected human-readable size, got: {preview}");
    }

    #[test]
    fn test_format_dry_run_actions_lists_direction_and_path() {
        let mut plan = DiffPlan::new();
        plan.add_action(action(Direction::AToB, "copy.txt", 1, SyncReason::New));
        plan.add_action(action(Direction::BToA, "update.txt", 2, SyncReason::MoreRecent));

        let listing = format_dry_run_actions(&plan);
        assert!(listing.contains("Dry-run actions:"));
        assert!(listing.contains("COPY    A→B  copy.txt"));
        assert!(listing.contains("UPDATE  B→A  update.txt"));
    }

    #[test]
    fn test_format_dry_run_actions_handles_empty_plan() {
        let listing = format_dry_run_actions(&DiffPlan::new());
        assert!(listing.contains("(no planned actions)"));
    }

    #[test]
    fn test_format_error_summary_groups_by_kind() {
        let records = vec![
            ErrorRecord::new(
                Path::new("a.txt"),
                &SyncError::PermissionDenied {
                    path: PathBuf::from("a.txt"),
                },
            ),
            ErrorRecord::new(
                Path::new("b.txt"),
                &SyncError::DiskFull {
                    path: PathBuf::from("b.txt"),
                },
            ),
            ErrorRecord::new(
                Path::new("c.txt"),
                &SyncError::PermissionDenied {
                    path: PathBuf::from("c.txt"),
                },
            ),
        ];

        let summary = format_error_summary(&records);
        assert!(summary.contains("Error summary:"));
        assert!(summary.contains("Permission denied (2):"));
        assert!(summary.contains("Disk full (1):"));
        assert!(summary.contains("Path: a.txt"));
        assert!(summary.contains("Try: Check file permissions"));
    }

    #[test]
    fn test_type_conflict_is_explained() {
        let err = SyncError::CopyFailed {
            path: PathBuf::from("dir"),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "exists"),
        };
        let record = ErrorRecord::new(Path::new("dir"), &err);

        assert_eq!(record.kind, "I/O error");
        assert!(record.message.contains("file and a folder"));
        assert!(record
            .suggestion
            .as_deref()
            .is_some_and(|s| s.contains("Rename one of them")));
    }
}
