//! Tree entry types produced while walking a directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Type of a walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File {
        /// Size in bytes.
        size: u64,
        /// Last modification time.
        modified: SystemTime,
    },
    /// Directory.
    Directory,
    /// Symbolic link (not followed by the walker).
    Symlink,
    /// Other file types (sockets, devices, etc.).
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink)
    }
}

/// A single entry visited during a walk.
///
/// Entries are transient: they are produced by the walker, consumed by the
/// sync phases, and never persisted.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,

    /// Path relative to the walk root, always `/`-separated.
    pub relative: String,

    /// Entry type and associated metadata.
    pub kind: EntryKind,

    /// Depth below the walk root (direct children are depth 1).
    pub depth: usize,
}

impl TreeEntry {
    /// Create a new entry.
    pub fn new(
        path: impl Into<PathBuf>,
        relative: impl Into<String>,
        kind: EntryKind,
        depth: usize,
    ) -> Self {
        Self {
            path: path.into(),
            relative: relative.into(),
            kind,
            depth,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Size in bytes for files, 0 otherwise.
    pub fn size(&self) -> u64 {
        match self.kind {
            EntryKind::File { size, .. } => size,
            _ => 0,
        }
    }

    /// Final component of the relative path.
    pub fn name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }

    /// The path this entry maps to under another root.
    pub fn rebase(&self, root: &Path) -> PathBuf {
        root.join(relative_to_native(&self.relative))
    }
}

/// Convert a `/`-separated relative path into a native relative path.
pub fn relative_to_native(relative: &str) -> PathBuf {
    relative.split('/').filter(|part| !part.is_empty()).collect()
}

/// Render a native relative path in `/`-separated form.
///
/// Only normal components are kept; the walker never produces `..` or
/// prefix components for paths below its root.
pub fn to_slash(relative: &Path) -> String {
    let mut out = String::new();
    for component in relative.components() {
        if let std::path::Component::Normal(name) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&name.to_string_lossy());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name() {
        let entry = TreeEntry::new("/src/a/b.txt", "a/b.txt", EntryKind::Directory, 2);
        assert_eq!(entry.name(), "b.txt");

        let top = TreeEntry::new("/src/top", "top", EntryKind::Directory, 1);
        assert_eq!(top.name(), "top");
    }

    #[test]
    fn test_rebase() {
        let entry = TreeEntry::new(
            "/src/a/b.txt",
            "a/b.txt",
            EntryKind::File {
                size: 3,
                modified: SystemTime::UNIX_EPOCH,
            },
            2,
        );
        assert_eq!(
            entry.rebase(Path::new("/dest")),
            Path::new("/dest").join("a").join("b.txt")
        );
        assert_eq!(entry.size(), 3);
    }

    #[test]
    fn test_to_slash() {
        let native: PathBuf = ["a", "b", "c.txt"].iter().collect();
        assert_eq!(to_slash(&native), "a/b/c.txt");
        assert_eq!(to_slash(Path::new("")), "");
    }

    #[test]
    fn test_kind_discrimination() {
        assert!(EntryKind::Directory.is_dir());
        assert!(!EntryKind::Directory.is_file());
        assert!(EntryKind::Symlink.is_symlink());
        assert!(EntryKind::File {
            size: 0,
            modified: SystemTime::UNIX_EPOCH
        }
        .is_file());
    }
}
