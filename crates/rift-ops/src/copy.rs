//! Incremental single-file copy.
//!
//! A destination file with the same size and modification time as its source
//! is considered in sync and left alone. Content is never compared.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::path::Path;

use filetime::FileTime;

use rift_core::SyncError;

/// What [`copy_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The destination was (re)written.
    Copied {
        /// Bytes written.
        bytes: u64,
    },
    /// Size and modification time already matched.
    Unchanged,
}

/// Options for copy operations.
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions {
    /// Whether newly created files take the source's permission bits.
    pub preserve_permissions: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            preserve_permissions: true,
        }
    }
}

/// Copy `source` to `dest` unless `dest` is already in sync.
pub fn copy_file(source: &Path, dest: &Path) -> Result<CopyOutcome, SyncError> {
    copy_file_with(source, dest, CopyOptions::default())
}

/// Copy `source` to `dest` with explicit options.
///
/// Symlinks are followed: the link target's content is copied.
pub fn copy_file_with(
    source: &Path,
    dest: &Path,
    options: CopyOptions,
) -> Result<CopyOutcome, SyncError> {
    let metadata = fs::metadata(source).map_err(|e| SyncError::source_io(source, e))?;

    if is_unchanged(&metadata, dest) {
        return Ok(CopyOutcome::Unchanged);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::source_io(parent, e))?;
    }

    let mut reader = File::open(source).map_err(|e| SyncError::source_io(source, e))?;
    let mut writer =
        open_dest(dest, &metadata, options).map_err(|e| SyncError::source_io(dest, e))?;

    let bytes = io::copy(&mut reader, &mut writer).map_err(|e| SyncError::source_io(dest, e))?;

    // Carry the source mtime over so the next run can skip this file.
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_handle_times(&writer, None, Some(mtime))
        .map_err(|e| SyncError::source_io(dest, e))?;

    tracing::debug!(from = %source.display(), to = %dest.display(), bytes, "copied");
    Ok(CopyOutcome::Copied { bytes })
}

/// Check the incremental skip rule: same size, same modification time.
pub fn is_unchanged(source: &Metadata, dest: &Path) -> bool {
    match fs::metadata(dest) {
        Ok(existing) => {
            existing.is_file()
                && existing.len() == source.len()
                && FileTime::from_last_modification_time(&existing)
                    == FileTime::from_last_modification_time(source)
        }
        Err(_) => false,
    }
}

fn open_dest(dest: &Path, source: &Metadata, options: CopyOptions) -> io::Result<File> {
    let mut open = OpenOptions::new();
    open.write(true).create(true).truncate(true);

    #[cfg(unix)]
    if options.preserve_permissions {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        open.mode(source.permissions().mode());
    }
    #[cfg(not(unix))]
    let _ = (source, options);

    open.open(dest)
}
