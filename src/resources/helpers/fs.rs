//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Whether anything (file, directory, or symlink, including a dangling one)
/// exists at `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Append `suffix` to the final component of `path`.
///
/// `with_extension` would replace an existing extension, which turns
/// `init.lua` into `init.backup`; this keeps the full file name.
#[must_use]
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// The `.backup` sibling of `path`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".backup")
}

/// Remove whatever lives at `path`: a file, a symlink, or a directory tree.
///
/// Does nothing if `path` does not exist. Symlinks are removed, never
/// followed.
///
/// # Errors
///
/// Returns an error if the entry exists but cannot be removed.
pub fn remove_entry(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("remove directory: {}", path.display()))?;
    } else {
        std::fs::remove_file(path).with_context(|| format!("remove: {}", path.display()))?;
    }
    Ok(())
}

/// Rename the entry at `path` to its `.backup` sibling.
///
/// A previous backup of the same name is removed first. Returns the backup
/// path, or `None` when there was nothing to move.
///
/// # Errors
///
/// Returns an error if the old backup cannot be removed or the rename fails.
pub fn move_to_backup(path: &Path) -> Result<Option<PathBuf>> {
    if !entry_exists(path) {
        return Ok(None);
    }
    let backup = backup_path(path);
    remove_entry(&backup)?;
    std::fs::rename(path, &backup)
        .with_context(|| format!("rename {} to {}", path.display(), backup.display()))?;
    Ok(Some(backup))
}

/// Copy `path` to a sibling named `<file>.backup.<stamp>`.
///
/// Returns the path of the copy.
///
/// # Errors
///
/// Returns an error if the file cannot be copied.
pub fn copy_to_timestamped_backup(path: &Path, stamp: &str) -> Result<PathBuf> {
    let backup = with_suffix(path, &format!(".backup.{stamp}"));
    std::fs::copy(path, &backup)
        .with_context(|| format!("copy {} to {}", path.display(), backup.display()))?;
    Ok(backup)
}
