//! Sync journal - per-run audit log kept inside each root
//!
//! Every run writes `<root>/.sync_logs/<YYYY-MM-DD_HHMMSS>_sync.log` in both
//! roots. Lines are appended and flushed as actions complete, so the log
//! reflects what happened even if the process is interrupted.
//!
//! The journal is best-effort: failing to create or write a log is reported
//! through `tracing` and never aborts the sync.

use crate::executor::ExecutionStats;
use crate::scanner::JOURNAL_DIR_NAME;
use crate::types::{Direction, SyncError, SyncReason};
use crate::Config;
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Result of one executed action, as written to the journal
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Success,
    Failure(&'a str),
}

/// One journal line
#[derive(Debug, Clone, Copy)]
pub struct JournalEntry<'a> {
    pub timestamp: DateTime<Local>,
    pub direction: Direction,
    pub path: &'a Path,
    pub reason: SyncReason,
    pub outcome: Outcome<'a>,
}

impl JournalEntry<'_> {
    /// Render as a single log line (no trailing newline)
    pub fn format(&self) -> String {
        let outcome = match self.outcome {
            Outcome::Success => "ok".to_string(),
            Outcome::Failure(message) => format!("FAILED ({})", message),
        };
        format!(
            "{} {} copied {}, reason={}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.path.display(),
            self.direction,
            self.reason,
            outcome
        )
    }
}

/// Log file name for a run started at `started_at`
pub fn journal_file_name(started_at: &DateTime<Local>) -> String {
    format!("{}_sync.log", started_at.format("%Y-%m-%d_%H%M%S"))
}

struct JournalSink {
    path: PathBuf,
    file: File,
}

/// Open journal files for one run
pub struct SyncJournal {
    started_at: DateTime<Local>,
    sinks: Vec<JournalSink>,
    failures: Vec<SyncError>,
}

impl SyncJournal {
    /// Create the journal directory in each root and open this run's log
    ///
    /// A root whose log cannot be opened is reported and left out; the
    /// journal keeps writing to the others.
    pub fn open(roots: &[&Path], started_at: DateTime<Local>) -> Self {
        let file_name = journal_file_name(&started_at);
        let mut journal = Self {
            started_at,
            sinks: Vec::with_capacity(roots.len()),
            failures: Vec::new(),
        };

        for root in roots {
            let dir = root.join(JOURNAL_DIR_NAME);
            let path = dir.join(&file_name);

            let opened = fs::create_dir_all(&dir).and_then(|_| {
                OpenOptions::new().create(true).append(true).open(&path)
            });

            match opened {
                Ok(file) => journal.sinks.push(JournalSink { path, file }),
                Err(source) => journal.report(SyncError::JournalWrite { path, source }),
            }
        }

        journal
    }

    /// Log files currently being written
    pub fn paths(&self) -> Vec<PathBuf> {
        self.sinks.iter().map(|sink| sink.path.clone()).collect()
    }

    /// Journal errors seen so far
    pub fn failures(&self) -> &[SyncError] {
        &self.failures
    }

    /// Write the run parameters
    pub fn write_header(&mut self, config: &Config) {
        let header = format!(
            "Sync started {}\n\
             Parameters:\n  \
             folder A: {}\n  \
             folder B: {}\n  \
             sync_most_recent: {}\n  \
             ignore_files: {:?}\n  \
             ignore_extensions: {:?}\n  \
             ignore_hidden: {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            config.root_a.display(),
            config.root_b.display(),
            config.sync_most_recent,
            config.ignore_files,
            config.ignore_extensions,
            config.ignore_hidden,
        );
        self.write_all(&header);
    }

    /// Append one action line
    pub fn record(&mut self, entry: &JournalEntry<'_>) {
        let line = format!("{}\n", entry.format());
        self.write_all(&line);
    }

    /// Write run totals
    pub fn write_footer(&mut self, scanned_files: usize, stats: &ExecutionStats, elapsed: Duration) {
        let footer = format!(
            "Synced {} files ({} copied, {} failed) in {:.2} seconds.\n",
            scanned_files,
            stats.completed_actions,
            stats.failed_actions,
            elapsed.as_secs_f64()
        );
        self.write_all(&footer);
    }

    fn write_all(&mut self, text: &str) {
        let mut broken = Vec::new();

        for (idx, sink) in self.sinks.iter_mut().enumerate() {
            let written = sink
                .file
                .write_all(text.as_bytes())
                .and_then(|_| sink.file.flush());
            if let Err(source) = written {
                broken.push((idx, SyncError::JournalWrite {
                    path: sink.path.clone(),
                    source,
                }));
            }
        }

        // A sink that failed once is dropped so the operator sees one warning per log.
        for (idx, error) in broken.into_iter().rev() {
            self.sinks.remove(idx);
            self.report(error);
        }
    }

    fn report(&mut self, error: SyncError) {
        warn!(error = %error, "sync log unavailable; continuing without it");
        self.failures.push(error);
    }
}
