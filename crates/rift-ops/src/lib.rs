//! Sync operations for rift.
//!
//! This crate mirrors a source tree into a destination in two phases: a
//! forward pass that copies what changed and records what must exist, then a
//! reclaim pass that removes everything else from the destination. All I/O is
//! blocking and runs on the calling thread.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use rift_filter::PatternSet;
//! use rift_ops::synchronize;
//!
//! let patterns = PatternSet::from_patterns([".git", "target/", "*.log"]);
//! let report = synchronize(Path::new("/work/app"), Path::new("/backup/app"), &patterns)?;
//! println!("{}", report.summary());
//! # Ok::<(), rift_core::SyncError>(())
//! ```

mod copy;
mod reclaim;
mod report;
mod sync;

pub use copy::{CopyOptions, CopyOutcome, copy_file, copy_file_with, is_unchanged};
pub use reclaim::{collect_orphans, reclaim, remove_orphans};
pub use report::SyncReport;
pub use sync::{Synchronizer, synchronize};

// Re-export core types for convenience
pub use rift_core::{SyncConfig, SyncError, ValidPathSet};
