//! Summary of a completed sync run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters collected over one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Destination directories that did not exist before the run.
    pub dirs_created: u64,
    /// Files written to the destination.
    pub files_copied: u64,
    /// Files skipped because size and modification time already matched.
    pub files_unchanged: u64,
    /// Total bytes written.
    pub bytes_copied: u64,
    /// Source entries left out by an exclusion pattern (pruned directories
    /// count once).
    pub entries_excluded: u64,
    /// Special files (sockets, FIFOs, devices) that were not mirrored.
    pub entries_unsupported: u64,
    /// Destination paths removed by the reclaim phase.
    pub orphans_removed: u64,
    /// Wall time of the whole run.
    pub duration: Duration,
}

impl SyncReport {
    /// Create new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly created directory.
    pub fn record_dir(&mut self) {
        self.dirs_created += 1;
    }

    /// Record a written file.
    pub fn record_copy(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }

    /// Record a file skipped by the incremental rule.
    pub fn record_unchanged(&mut self) {
        self.files_unchanged += 1;
    }

    /// Check whether the run changed nothing in the destination.
    pub fn is_noop(&self) -> bool {
        self.dirs_created == 0 && self.files_copied == 0 && self.orphans_removed == 0
    }

    /// Get a human-readable summary of the run.
    pub fn summary(&self) -> String {
        if self.is_noop() {
            return format!("Already in sync ({} files)", self.files_unchanged);
        }

        let mut summary = format!(
            "Copied {} files, {} unchanged, {} directories created, {} orphans removed",
            self.files_copied, self.files_unchanged, self.dirs_created, self.orphans_removed
        );
        if self.entries_unsupported > 0 {
            summary.push_str(&format!(", {} special files skipped", self.entries_unsupported));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut report = SyncReport::new();
        report.record_copy(10);
        report.record_copy(5);
        report.record_unchanged();
        report.record_dir();

        assert_eq!(report.files_copied, 2);
        assert_eq!(report.bytes_copied, 15);
        assert_eq!(report.files_unchanged, 1);
        assert!(!report.is_noop());
    }

    #[test]
    fn test_summary() {
        let mut report = SyncReport::new();
        report.record_unchanged();
        assert_eq!(report.summary(), "Already in sync (1 files)");

        report.orphans_removed = 3;
        assert_eq!(
            report.summary(),
            "Copied 0 files, 1 unchanged, 0 directories created, 3 orphans removed"
        );
    }
}
