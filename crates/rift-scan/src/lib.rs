//! Directory traversal for rift.
//!
//! This crate walks a tree depth-first in pre-order using jwalk, serially on
//! the calling thread. A classifier callback decides, before a directory's
//! children are read, whether the walk should descend into it, yield it
//! without descending, or drop it entirely.
//!
//! # Example
//!
//! ```rust,no_run
//! use rift_scan::{TreeWalker, WalkControl};
//!
//! let walker = TreeWalker::new("/path/to/project");
//! for visit in walker.walk(|relative, is_dir| {
//!     if is_dir && relative.ends_with("node_modules") {
//!         WalkControl::Skip
//!     } else {
//!         WalkControl::Descend
//!     }
//! }) {
//!     let visit = visit.unwrap();
//!     println!("{}", visit.entry.relative);
//! }
//! ```

mod walker;

pub use walker::{TreeWalker, Visit, Walk, WalkControl};

// Re-export core types for convenience
pub use rift_core::{EntryError, EntryKind, TreeEntry};
