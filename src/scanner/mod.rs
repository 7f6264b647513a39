//! Directory scanning logic

mod filter;
mod walker;

pub use filter::{is_partial_copy_name, IgnoreSpec, JOURNAL_DIR_NAME, PART_SUFFIX};
pub use walker::{scan_directory, ProgressCallback};
