//! Core types for rift.
//!
//! This crate provides the data structures shared by the walker, the pattern
//! matcher and the sync operations: walked entries, the per-run valid path
//! set, configuration and errors.

mod config;
mod entry;
mod error;
mod plan;

pub use config::{SyncConfig, SyncConfigBuilder};
pub use entry::{EntryKind, TreeEntry, relative_to_native, to_slash};
pub use error::{EntryError, SyncError};
pub use plan::{ValidPathSet, ensure_disjoint};
