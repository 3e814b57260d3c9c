//! Exclusion matching for rift.
//!
//! This crate decides which source paths are left out of a sync:
//!
//! - **Patterns** - gitignore-style globs with directory-only (`name/`),
//!   any-depth (`**/name`), unrooted (`name`) and rooted (`a/b`) forms
//! - **Pattern sets** - ordered collections evaluated as a logical OR
//! - **Ignore files** - `.gitignore` loading, minus negations
//!
//! ```rust
//! use rift_filter::PatternSet;
//!
//! let set = PatternSet::from_patterns(["*.log", "node_modules/", "build/output"]);
//!
//! assert!(set.should_exclude("logs/debug.log", false));
//! assert!(set.should_exclude("web/node_modules", true));
//! assert!(!set.should_exclude("web/node_modules", false));
//! assert!(set.should_exclude("build/output", true));
//! assert!(!set.should_exclude("src/build/output", true));
//! ```
//!
//! Paths are always relative to the tree root and `/`-separated.

pub mod gitignore;
mod pattern;
mod set;

use thiserror::Error;

pub use gitignore::{load_gitignore, parse_gitignore};
pub use pattern::ExclusionPattern;
pub use set::{DEFAULT_EXCLUDES, PatternSet, matches, should_exclude};

/// A pattern whose glob could not be compiled.
#[derive(Debug, Error)]
#[error("invalid exclusion pattern '{pattern}': {source}")]
pub struct PatternError {
    pattern: String,
    #[source]
    source: globset::Error,
}

impl PatternError {
    pub(crate) fn new(pattern: String, source: globset::Error) -> Self {
        Self { pattern, source }
    }

    /// The offending pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
