//! Preserving directory trees before they are removed
//!
//! A retired directory is copied as a whole under its versioned name in the
//! trash root, keeping its inner layout and hidden entries.

use crate::executor::Executor;
use crate::types::MirrorError;
use std::fs;
use std::path::Path;

/// Copy every file under `dir` into `backup_dir`, mirroring its layout.
///
/// Stops at the first failure so the caller can keep the original.
/// Symlinked directories are not descended into: removing the tree only
/// removes the link, so their content is never at risk.
pub fn backup_tree(
    executor: &Executor<'_>,
    dir: &Path,
    backup_dir: &Path,
    dry_run: bool,
) -> Result<u64, MirrorError> {
    executor.ensure_dir(backup_dir, dry_run)?;

    let listing = fs::read_dir(dir).map_err(|e| MirrorError::list(dir, e))?;
    let mut files = 0u64;

    for child in listing {
        let child = child.map_err(|e| MirrorError::list(dir, e))?;
        let path = child.path();
        let target = backup_dir.join(child.file_name());

        let link_meta = fs::symlink_metadata(&path).map_err(|e| MirrorError::stat(&path, e))?;
        if link_meta.file_type().is_symlink() {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {
                    executor.copy(&path, &target, dry_run)?;
                    files += 1;
                }
                _ => {
                    tracing::debug!(path = %path.display(), "not backing up directory or dangling link");
                }
            }
        } else if link_meta.is_dir() {
            files += backup_tree(executor, &path, &target, dry_run)?;
        } else {
            executor.copy(&path, &target, dry_run)?;
            files += 1;
        }
    }

    Ok(files)
}
