//! Progress reporting

use crate::types::Direction;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Terminal progress for one sync run
///
/// One spinner is shared by both scans. The copy bar counts processed
/// actions, failed ones included. Both are hidden when stderr is not a
/// terminal.
pub struct ProgressReporter {
    scan_bar: ProgressBar,
    copy_bar: ProgressBar,
    copied_bytes: u64,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let scan_bar = ProgressBar::new_spinner();
        scan_bar.enable_steady_tick(Duration::from_millis(120));

        let copy_bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
            copy_bar.set_style(style);
        }

        Self {
            scan_bar,
            copy_bar,
            copied_bytes: 0,
        }
    }

    pub fn start_scan(&self, label: &str) {
        self.scan_bar.set_message(format!("Scanning {}...", label));
    }

    pub fn update_scan(&self, label: &str, files: u64, bytes: u64) {
        self.scan_bar.set_message(format!(
            "Scanning {}... {} files ({})",
            label,
            files,
            HumanBytes(bytes)
        ));
    }

    /// Print the totals for one root above the spinner
    pub fn finish_scan(&self, label: &str, files: usize, bytes: u64) {
        self.scan_bar.println(format!(
            "Folder {}: {} files ({})",
            label,
            files,
            HumanBytes(bytes)
        ));
    }

    pub fn end_scans(&self) {
        self.scan_bar.finish_and_clear();
    }

    pub fn start_transfer(&mut self, total_copies: u64) {
        self.copied_bytes = 0;
        self.copy_bar.set_length(total_copies);
        self.copy_bar.set_position(0);
    }

    pub fn set_current_file(&self, direction: Direction, path: &Path) {
        self.copy_bar
            .set_message(format!("{} {}", direction, path.display()));
    }

    pub fn complete_transfer_file(&mut self, bytes: u64) {
        self.copied_bytes = self.copied_bytes.saturating_add(bytes);
        self.copy_bar.inc(1);
    }

    /// Print a failed copy above the bar and count it as processed
    pub fn transfer_error(&self, direction: Direction, path: &Path, err: &str) {
        self.copy_bar
            .println(format!("FAILED {} {}: {}", direction, path.display(), err));
        self.copy_bar.inc(1);
    }

    pub fn finish_transfer(&self, succeeded: usize, failed: usize) {
        self.copy_bar.finish_with_message(format!(
            "{} copied, {} failed ({})",
            succeeded,
            failed,
            HumanBytes(self.copied_bytes)
        ));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
