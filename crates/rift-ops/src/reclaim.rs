//! Orphan removal: the backward phase of a sync.
//!
//! The destination is walked once to collect every path the forward phase
//! did not produce. Orphan directories are pruned from the walk since they are
//! removed whole. Deletion starts only after the walk is finished.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use rift_core::{SyncError, TreeEntry, ValidPathSet, relative_to_native};
use rift_scan::{TreeWalker, WalkControl};

/// Delete everything under `dest_root` that is not in `valid`.
///
/// Returns the number of top-level orphans removed (an orphan directory
/// counts once, whatever it contains). A missing `dest_root` is not an error.
pub fn reclaim(dest_root: &Path, valid: ValidPathSet) -> Result<usize, SyncError> {
    let orphans = collect_orphans(dest_root, valid)?;
    remove_orphans(&orphans)?;
    Ok(orphans.len())
}

/// Walk `dest_root` and list the paths absent from `valid`, outermost first.
pub fn collect_orphans(dest_root: &Path, valid: ValidPathSet) -> Result<Vec<TreeEntry>, SyncError> {
    match fs::symlink_metadata(dest_root) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(root = %dest_root.display(), "destination missing, nothing to reclaim");
            return Ok(Vec::new());
        }
        Err(e) => return Err(SyncError::destination_io(dest_root, e)),
    }

    let valid = Arc::new(valid);
    let root = dest_root.to_path_buf();
    let walker = TreeWalker::new(dest_root);

    let mut orphans = Vec::new();
    for visit in walker.walk(move |relative, _is_dir| {
        if valid.contains(&root.join(relative_to_native(relative))) {
            WalkControl::Descend
        } else {
            WalkControl::Prune
        }
    }) {
        let visit = visit.map_err(SyncError::Destination)?;
        if visit.is_pruned() {
            orphans.push(visit.entry);
        }
    }

    Ok(orphans)
}

/// Remove each orphan; directories are removed with their contents.
///
/// Stops at the first failure. Orphans removed before it stay removed.
pub fn remove_orphans(orphans: &[TreeEntry]) -> Result<(), SyncError> {
    for orphan in orphans {
        let result = if orphan.is_dir() {
            fs::remove_dir_all(&orphan.path)
        } else {
            fs::remove_file(&orphan.path)
        };

        match result {
            Ok(()) => tracing::debug!(path = %orphan.path.display(), "removed orphan"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SyncError::Remove {
                    path: orphan.path.clone(),
                    source,
                });
            }
        }
    }
    Ok(())
}
