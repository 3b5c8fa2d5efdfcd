//! Entry - one filesystem object met during traversal

use crate::types::MirrorError;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What kind of object an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    SymlinkToFile,
    SymlinkToDirectory,
    /// Platform shortcut file naming another location
    AliasFile,
}

impl EntryKind {
    /// Whether the walk should descend into this entry
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory | EntryKind::SymlinkToDirectory)
    }
}

/// Represents one entry during traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Absolute path as seen through the walked tree
    pub path: PathBuf,

    pub kind: EntryKind,

    /// Size in bytes of the (link-followed) target
    pub size: u64,

    /// Last modification time of the (link-followed) target
    pub mtime: SystemTime,
}

impl Entry {
    /// Stat `path`, following symlinks, and classify it.
    ///
    /// A dangling symlink is a `Stat` error, like any other missing entry.
    pub fn stat(path: &Path) -> Result<Self, MirrorError> {
        let metadata = fs::metadata(path).map_err(|e| MirrorError::stat(path, e))?;
        let is_link = fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .map_err(|e| MirrorError::stat(path, e))?;
        let mtime = metadata
            .modified()
            .map_err(|e| MirrorError::stat(path, e))?;

        let kind = match (metadata.is_dir(), is_link) {
            (true, false) => EntryKind::Directory,
            (true, true) => EntryKind::SymlinkToDirectory,
            (false, false) => EntryKind::File,
            (false, true) => EntryKind::SymlinkToFile,
        };

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            size: metadata.len(),
            mtime,
        })
    }

    /// Reclassify a file entry as a platform alias
    pub fn into_alias(mut self) -> Self {
        if !self.kind.is_dir() {
            self.kind = EntryKind::AliasFile;
        }
        self
    }

    /// Final path component as a string
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Size and modification time both match exactly
    pub fn same_content_stamp(&self, other: &Entry) -> bool {
        self.size == other.size && self.mtime == other.mtime
    }
}
