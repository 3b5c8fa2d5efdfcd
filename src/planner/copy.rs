//! Per-file copy decision

use crate::config::Config;
use crate::planner::naming::backup_file_name;
use crate::platform::Platform;
use crate::types::{Action, Entry, MirrorError};
use std::path::{Path, PathBuf};

/// Decide what to do with one source file.
///
/// The file is resolved through `platform` first, so a symlinked source
/// contributes its target's content; the destination is computed from the
/// unresolved path.
pub fn plan_copy(
    config: &Config,
    platform: &dyn Platform,
    source_path: &Path,
) -> Result<Action, MirrorError> {
    let resolved = platform.resolve(source_path)?;
    let destination = config.destination_for(source_path)?;
    plan_copy_between(config, &resolved, &destination)
}

/// Decide between skip, backup-then-copy and copy for an explicit pair.
///
/// Metadata comparison:
/// 1. No backup requested, or nothing at `to` yet → Copy
/// 2. `compare_modified` and size + mtime equal (no tolerance) → Skip
/// 3. Otherwise → BackupThenCopy, preserving the current `to`
pub fn plan_copy_between(config: &Config, from: &Path, to: &Path) -> Result<Action, MirrorError> {
    if !(config.backup_on_overwrite && to.exists()) {
        return Ok(Action::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    let src = Entry::stat(from)?;
    let dest = Entry::stat(to)?;

    if config.compare_modified && src.same_content_stamp(&dest) {
        return Ok(Action::Skip {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    Ok(Action::BackupThenCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        backup_to: backup_path_for(config, &dest)?,
    })
}

/// Where the current version of a destination entry is preserved:
/// `trash + (parent − destination) + backup name`
pub fn backup_path_for(config: &Config, destination_entry: &Entry) -> Result<PathBuf, MirrorError> {
    let parent = destination_entry
        .path
        .parent()
        .unwrap_or(&config.destination);
    let trash_dir = config.trash_dir_for(parent)?;
    Ok(trash_dir.join(backup_file_name(
        &destination_entry.file_name(),
        destination_entry.mtime,
    )))
}
