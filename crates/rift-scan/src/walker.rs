//! JWalk-based pre-order walker with per-entry traversal control.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::{Parallelism, WalkDirGeneric};

use rift_core::{EntryError, EntryKind, TreeEntry, to_slash};

/// What the walker does with an entry after classifying it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkControl {
    /// Yield the entry and, for directories, walk its children.
    #[default]
    Descend,
    /// Yield the entry but never read its children.
    Prune,
    /// Drop the entry and everything below it.
    Skip,
}

/// jwalk client state: the per-entry decision travels with the entry.
type WalkState = ((), WalkControl);

/// An entry produced by a walk, with the decision that let it through.
#[derive(Debug, Clone)]
pub struct Visit {
    /// The visited entry.
    pub entry: TreeEntry,
    /// [`WalkControl::Descend`] or [`WalkControl::Prune`]; skipped entries
    /// are never yielded.
    pub control: WalkControl,
}

impl Visit {
    /// Check whether the classifier pruned this entry.
    pub fn is_pruned(&self) -> bool {
        self.control == WalkControl::Prune
    }
}

/// Depth-first, pre-order walker over a directory tree.
///
/// Traversal runs serially on the calling thread and children are visited in
/// file-name order. The root itself is never yielded.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    /// Create a walker rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The walk root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree, asking `classify` about every entry before its
    /// children are read.
    ///
    /// `classify` receives the `/`-separated path relative to the root and
    /// whether the entry is a directory (symlinks are never directories).
    pub fn walk<F>(&self, classify: F) -> Walk
    where
        F: Fn(&str, bool) -> WalkControl + Send + Sync + 'static,
    {
        let root: Arc<Path> = Arc::from(self.root.as_path());
        let classify_root = Arc::clone(&root);

        let inner = WalkDirGeneric::<WalkState>::new(&self.root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(1)
            .process_read_dir(move |_depth, _dir, _state, children| {
                children.retain_mut(|child| {
                    let Ok(entry) = child else {
                        // Keep errors so the iterator surfaces them.
                        return true;
                    };
                    let path = entry.path();
                    let Ok(relative) = path.strip_prefix(&*classify_root) else {
                        return true;
                    };
                    if relative.as_os_str().is_empty() {
                        // The root itself is handed to this callback once.
                        return true;
                    }

                    let relative = to_slash(relative);
                    let control = classify(&relative, entry.file_type.is_dir());
                    match control {
                        WalkControl::Skip => {
                            tracing::trace!(path = %relative, "skipped subtree");
                            false
                        }
                        WalkControl::Prune => {
                            tracing::trace!(path = %relative, "pruned");
                            entry.read_children_path = None;
                            entry.client_state = control;
                            true
                        }
                        WalkControl::Descend => {
                            entry.client_state = control;
                            true
                        }
                    }
                });
            })
            .into_iter();

        Walk {
            root,
            inner: Box::new(inner),
        }
    }
}

/// Iterator over the entries of a [`TreeWalker::walk`].
///
/// Stops being useful after the first error: callers are expected to abort.
pub struct Walk {
    root: Arc<Path>,
    inner: Box<dyn Iterator<Item = Result<jwalk::DirEntry<WalkState>, jwalk::Error>>>,
}

impl Iterator for Walk {
    type Item = Result<Visit, EntryError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.next()?;
        Some(match next {
            Ok(entry) => self.visit(entry),
            Err(err) => Err(walk_error(&err, &self.root)),
        })
    }
}

impl Walk {
    fn visit(&self, entry: jwalk::DirEntry<WalkState>) -> Result<Visit, EntryError> {
        if let Some(err) = &entry.read_children_error {
            return Err(walk_error(err, &self.root));
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(&*self.root)
            .map(to_slash)
            .map_err(|_| EntryError::Walk {
                path: path.clone(),
                message: format!("not below walk root {}", self.root.display()),
            })?;

        let file_type = entry.file_type;
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_file() {
            let metadata = fs::symlink_metadata(&path).map_err(|e| EntryError::io(&path, e))?;
            let modified = metadata.modified().map_err(|e| EntryError::io(&path, e))?;
            EntryKind::File {
                size: metadata.len(),
                modified,
            }
        } else {
            EntryKind::Other
        };

        Ok(Visit {
            entry: TreeEntry::new(path, relative, kind, entry.depth),
            control: entry.client_state,
        })
    }
}

/// Convert a jwalk error, keeping the I/O classification when there is one.
fn walk_error(err: &jwalk::Error, root: &Path) -> EntryError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    match err.io_error() {
        Some(io_err) => EntryError::io(path, io::Error::new(io_err.kind(), io_err.to_string())),
        None => EntryError::Walk {
            path,
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();
        fs::write(root.join(".hidden"), "dot").unwrap();

        temp
    }

    fn relatives(walk: Walk) -> Vec<String> {
        walk.map(|v| v.unwrap().entry.relative).collect()
    }

    #[test]
    fn test_preorder_sorted_walk() {
        let temp = create_test_tree();
        let walker = TreeWalker::new(temp.path());

        let seen = relatives(walker.walk(|_, _| WalkControl::Descend));
        assert_eq!(
            seen,
            vec![
                ".hidden",
                "dir1",
                "dir1/file2.txt",
                "dir1/subdir",
                "dir1/subdir/file3.txt",
                "dir2",
                "dir2/file4.txt",
                "file1.txt",
            ]
        );
    }

    #[test]
    fn test_skip_drops_subtree() {
        let temp = create_test_tree();
        let walker = TreeWalker::new(temp.path());

        let seen = relatives(walker.walk(|rel, is_dir| {
            if is_dir && rel == "dir1" {
                WalkControl::Skip
            } else {
                WalkControl::Descend
            }
        }));
        assert!(!seen.iter().any(|r| r.starts_with("dir1")));
        assert!(seen.contains(&"dir2/file4.txt".to_string()));
    }

    #[test]
    fn test_prune_yields_entry_without_children() {
        let temp = create_test_tree();
        let walker = TreeWalker::new(temp.path());

        let visits: Vec<_> = walker
            .walk(|rel, _| {
                if rel == "dir1" {
                    WalkControl::Prune
                } else {
                    WalkControl::Descend
                }
            })
            .map(Result::unwrap)
            .collect();

        let dir1 = visits.iter().find(|v| v.entry.relative == "dir1").unwrap();
        assert!(dir1.is_pruned());
        assert!(dir1.entry.is_dir());
        assert!(!visits.iter().any(|v| v.entry.relative.starts_with("dir1/")));
        assert!(visits.iter().filter(|v| v.is_pruned()).count() == 1);
    }

    #[test]
    fn test_file_metadata_and_depth() {
        let temp = create_test_tree();
        let walker = TreeWalker::new(temp.path());

        let file = walker
            .walk(|_, _| WalkControl::Descend)
            .map(Result::unwrap)
            .find(|v| v.entry.relative == "dir1/subdir/file3.txt")
            .unwrap()
            .entry;

        assert_eq!(file.size(), 4);
        assert_eq!(file.depth, 3);
        assert_eq!(file.path, temp.path().join("dir1/subdir/file3.txt"));
    }

    #[test]
    fn test_classifier_sees_relative_paths() {
        let temp = create_test_tree();
        let walker = TreeWalker::new(temp.path());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        walker
            .walk(move |rel, is_dir| {
                sink.lock().unwrap().push((rel.to_string(), is_dir));
                WalkControl::Descend
            })
            .for_each(drop);

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&("dir1/subdir".to_string(), true)));
        assert!(seen.contains(&("dir1/subdir/file3.txt".to_string(), false)));
        assert!(!seen.iter().any(|(rel, _)| rel.is_empty()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let temp = create_test_tree();
        let locked = temp.path().join("dir2");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Running as root: permission bits are not enforced.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = TreeWalker::new(temp.path())
            .walk(|_, _| WalkControl::Descend)
            .find_map(Result::err);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let err = err.unwrap();
        assert!(matches!(err, EntryError::PermissionDenied { .. }), "{err}");
        assert!(err.path().starts_with(temp.path()));
    }
}
