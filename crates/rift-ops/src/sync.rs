//! Two-phase tree synchronization.
//!
//! 1. **Forward**: walk the source in pre-order, drop excluded entries (an
//!    excluded directory takes its whole subtree with it), create directories
//!    and copy files into the destination, and record every destination path
//!    produced.
//! 2. **Reclaim**: walk the destination and remove whatever the forward phase
//!    did not record.
//!
//! The reclaim phase only starts once the forward phase has finished without
//! error.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rift_core::{EntryKind, SyncConfig, SyncError, TreeEntry, ValidPathSet, ensure_disjoint};
use rift_filter::PatternSet;
use rift_scan::{TreeWalker, WalkControl};

use crate::copy::{CopyOptions, CopyOutcome, copy_file_with};
use crate::reclaim::reclaim;
use crate::report::SyncReport;

/// Mirror `source_root` into `dest_root`, excluding `patterns`.
pub fn synchronize(
    source_root: &Path,
    dest_root: &Path,
    patterns: &PatternSet,
) -> Result<SyncReport, SyncError> {
    Synchronizer::with_patterns(SyncConfig::new(source_root, dest_root), patterns.clone()).run()
}

/// Runs a configured sync.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    config: SyncConfig,
    patterns: Arc<PatternSet>,
}

impl Synchronizer {
    /// Create a synchronizer, compiling the config's exclusion patterns.
    ///
    /// Patterns that fail to compile are logged and dropped.
    pub fn new(config: SyncConfig) -> Self {
        let patterns = PatternSet::from_patterns(config.exclude_patterns.iter().cloned());
        Self::with_patterns(config, patterns)
    }

    /// Create a synchronizer with an already compiled pattern set.
    ///
    /// The config's own `exclude_patterns` are ignored.
    pub fn with_patterns(config: SyncConfig, patterns: PatternSet) -> Self {
        Self {
            config,
            patterns: Arc::new(patterns),
        }
    }

    /// The configuration this synchronizer runs with.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run both phases.
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        let start = Instant::now();
        self.check_roots()?;

        tracing::info!(
            source = %self.config.source.display(),
            destination = %self.config.destination.display(),
            patterns = self.patterns.len(),
            "sync started"
        );

        let (valid, mut report) = self.forward()?;
        tracing::info!(kept = valid.len(), "forward phase complete");

        report.orphans_removed = reclaim(&self.config.destination, valid)? as u64;
        report.duration = start.elapsed();

        tracing::info!(
            copied = report.files_copied,
            unchanged = report.files_unchanged,
            removed = report.orphans_removed,
            elapsed_ms = report.duration.as_millis() as u64,
            "sync complete"
        );
        Ok(report)
    }

    /// Run the forward phase only, returning the destination paths that must
    /// survive reconciliation.
    pub fn forward(&self) -> Result<(ValidPathSet, SyncReport), SyncError> {
        let source_root = &self.config.source;
        let dest_root = &self.config.destination;

        let excluded = Arc::new(AtomicU64::new(0));
        let classify = {
            let patterns = Arc::clone(&self.patterns);
            let excluded = Arc::clone(&excluded);
            move |relative: &str, is_dir: bool| {
                if let Some(pattern) = patterns.first_match(relative, is_dir) {
                    tracing::debug!(path = relative, pattern = pattern.as_str(), "excluded");
                    excluded.fetch_add(1, Ordering::Relaxed);
                    WalkControl::Skip
                } else {
                    WalkControl::Descend
                }
            }
        };

        let mut valid = ValidPathSet::new();
        let mut report = SyncReport::new();
        let copy_options = CopyOptions {
            preserve_permissions: self.config.preserve_permissions,
        };

        for visit in TreeWalker::new(source_root).walk(classify) {
            let entry = visit.map_err(SyncError::Source)?.entry;

            if matches!(entry.kind, EntryKind::Other) {
                tracing::warn!(path = %entry.path.display(), "skipping special file");
                report.entries_unsupported += 1;
                continue;
            }

            let dest_path = entry.rebase(dest_root);
            valid.insert(dest_path.clone());

            if entry.is_dir() {
                if self.ensure_dir(&entry, &dest_path)? {
                    report.record_dir();
                }
                continue;
            }

            match copy_file_with(&entry.path, &dest_path, copy_options)? {
                CopyOutcome::Copied { bytes } => report.record_copy(bytes),
                CopyOutcome::Unchanged => report.record_unchanged(),
            }
        }

        report.entries_excluded = excluded.load(Ordering::Relaxed);
        Ok((valid, report))
    }

    fn check_roots(&self) -> Result<(), SyncError> {
        let source = &self.config.source;
        if source.as_os_str().is_empty() || self.config.destination.as_os_str().is_empty() {
            return Err(SyncError::InvalidConfig {
                message: "source and destination paths are required".to_string(),
            });
        }
        let metadata = fs::metadata(source).map_err(|e| SyncError::source_io(source, e))?;
        if !metadata.is_dir() {
            return Err(SyncError::NotADirectory {
                path: source.clone(),
            });
        }
        if self.config.reject_overlap {
            ensure_disjoint(source, &self.config.destination)?;
        }
        Ok(())
    }

    /// Create the destination directory for `entry` if missing. Returns
    /// whether it was created.
    fn ensure_dir(&self, entry: &TreeEntry, dest_path: &Path) -> Result<bool, SyncError> {
        if dest_path.is_dir() {
            return Ok(false);
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        if self.config.preserve_permissions {
            use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
            let mode = fs::metadata(&entry.path)
                .map_err(|e| SyncError::source_io(&entry.path, e))?
                .permissions()
                .mode();
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = entry;

        builder
            .create(dest_path)
            .map_err(|e| SyncError::source_io(dest_path, e))?;
        tracing::debug!(path = %dest_path.display(), "created directory");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_forward_records_surviving_paths() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dest = temp.path().join("dest");
        fs::create_dir_all(src.join("keep")).unwrap();
        fs::create_dir_all(src.join("target/debug")).unwrap();
        fs::write(src.join("keep/a.txt"), "a").unwrap();
        fs::write(src.join("target/debug/bin"), "b").unwrap();

        let sync = Synchronizer::new(SyncConfig::new(&src, &dest).with_patterns(["target/"]));
        let (valid, report) = sync.forward().unwrap();

        assert!(valid.contains(&dest.join("keep")));
        assert!(valid.contains(&dest.join("keep").join("a.txt")));
        assert!(!valid.contains(&dest.join("target")));
        assert_eq!(valid.len(), 2);
        assert_eq!(report.entries_excluded, 1);
        assert_eq!(report.dirs_created, 1);
        assert_eq!(report.files_copied, 1);
    }

    #[test]
    fn test_source_must_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = Synchronizer::new(SyncConfig::new(&file, temp.path().join("out")))
            .run()
            .unwrap_err();
        assert!(matches!(err, SyncError::NotADirectory { .. }));
    }

    #[test]
    fn test_empty_roots_rejected() {
        let err = Synchronizer::new(SyncConfig::new("", "/tmp/out")).run().unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig { .. }));
    }

    #[test]
    fn test_overlap_rejected_before_any_write() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();

        let err = Synchronizer::new(SyncConfig::new(&src, src.join("mirror")))
            .run()
            .unwrap_err();
        assert!(matches!(err, SyncError::OverlappingTrees { .. }));
        assert!(!src.join("mirror").exists());
    }
}
