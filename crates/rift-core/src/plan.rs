//! Per-run sync state: the set of destination paths that must survive, and
//! the disjointness check between the two roots.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::SyncError;

/// Destination paths that the forward phase produced or kept.
///
/// Owned by a single sync run: built by the forward phase, then read by the
/// reclaim phase to decide what is an orphan.
#[derive(Debug, Clone, Default)]
pub struct ValidPathSet {
    paths: HashSet<PathBuf>,
}

impl ValidPathSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a destination path as valid.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    /// Check whether a destination path must be kept.
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if no paths were recorded.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the recorded paths in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ValidPathSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fail if `dest_root` equals, contains, or lies inside `source_root`.
///
/// Both roots are resolved through symlinks first. A destination that does
/// not exist yet is resolved through its deepest existing ancestor.
pub fn ensure_disjoint(source_root: &Path, dest_root: &Path) -> Result<(), SyncError> {
    let source = resolve(source_root).map_err(|e| SyncError::source_io(source_root, e))?;
    let dest = resolve(dest_root).map_err(|e| SyncError::destination_io(dest_root, e))?;

    if dest.starts_with(&source) || source.starts_with(&dest) {
        return Err(SyncError::OverlappingTrees {
            source_root: source,
            dest_root: dest,
        });
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and re-append the rest.
fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(resolved) => {
                return Ok(missing.iter().rev().fold(resolved, |acc, name| acc.join(name)));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(e);
                };
                missing.push(name.to_os_string());
                existing = parent;
            }
            Err(e) => return Err(e),
        }
    }
}
