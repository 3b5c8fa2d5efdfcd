//! Deletion-sync planning for one directory

use crate::config::Config;
use crate::planner::copy::backup_path_for;
use crate::types::{Action, Entry, MirrorError};
use std::fs;
use std::path::{Path, PathBuf};

/// Retirement decisions for one mirrored directory
#[derive(Debug)]
pub struct SyncPlan {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,

    /// One step per destination-only child, in listing order.
    /// A failed step does not prevent the others.
    pub steps: Vec<Result<Action, MirrorError>>,
}

/// Compare the mirror of `source_dir` against `source_dir` and plan the
/// retirement of every destination child with no same-named source entry.
///
/// Returns `None` when deletion-sync is off or the mirror does not exist yet.
/// Entries present on both sides are never touched.
pub fn plan_sync(config: &Config, source_dir: &Path) -> Result<Option<SyncPlan>, MirrorError> {
    if !config.sync_deletions {
        return Ok(None);
    }

    let destination_dir = config.destination_for(source_dir)?;
    if !destination_dir.exists() {
        return Ok(None);
    }

    let listing =
        fs::read_dir(&destination_dir).map_err(|e| MirrorError::list(&destination_dir, e))?;

    let mut steps = Vec::new();
    for child in listing {
        let child = match child {
            Ok(child) => child,
            Err(e) => {
                steps.push(Err(MirrorError::list(&destination_dir, e)));
                continue;
            }
        };

        let name = child.file_name();
        let counterpart = source_dir.join(&name);
        // Match by name; a dangling symlink in the source still counts.
        if fs::symlink_metadata(&counterpart).is_ok() {
            continue;
        }

        steps.push(plan_retirement(config, &child.path()));
    }

    Ok(Some(SyncPlan {
        source_dir: source_dir.to_path_buf(),
        destination_dir,
        steps,
    }))
}

fn plan_retirement(config: &Config, destination_path: &Path) -> Result<Action, MirrorError> {
    let entry = Entry::stat(destination_path)?;
    let backup_to = backup_path_for(config, &entry)?;

    if entry.kind.is_dir() {
        Ok(Action::BackupThenRemoveSubtree {
            path: entry.path,
            backup_to,
        })
    } else {
        Ok(Action::BackupThenRemove {
            path: entry.path,
            backup_to,
        })
    }
}
