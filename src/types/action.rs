//! Action - decisions produced by the planners

use std::path::{Path, PathBuf};

/// One decision about one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Destination is already up to date
    Skip { from: PathBuf, to: PathBuf },

    /// Create a directory and any missing parents
    MakeDirectory(PathBuf),

    /// Copy a file that has no counterpart in the destination yet
    Copy { from: PathBuf, to: PathBuf },

    /// Preserve the destination's current content, then overwrite it
    BackupThenCopy {
        from: PathBuf,
        to: PathBuf,
        backup_to: PathBuf,
    },

    /// Preserve a destination-only file, then delete it
    BackupThenRemove { path: PathBuf, backup_to: PathBuf },

    /// Preserve a destination-only directory tree, then delete it
    BackupThenRemoveSubtree { path: PathBuf, backup_to: PathBuf },
}

impl Action {
    /// Short label used in logs
    pub fn action_name(&self) -> &'static str {
        match self {
            Action::Skip { .. } => "Skip",
            Action::MakeDirectory(_) => "Mkdir",
            Action::Copy { .. } => "Copy",
            Action::BackupThenCopy { .. } => "Update",
            Action::BackupThenRemove { .. } => "Retire",
            Action::BackupThenRemoveSubtree { .. } => "RetireTree",
        }
    }

    /// The path the action changes
    pub fn target(&self) -> &Path {
        match self {
            Action::Skip { to, .. }
            | Action::Copy { to, .. }
            | Action::BackupThenCopy { to, .. } => to,
            Action::MakeDirectory(path)
            | Action::BackupThenRemove { path, .. }
            | Action::BackupThenRemoveSubtree { path, .. } => path,
        }
    }
}
