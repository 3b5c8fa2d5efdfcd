//! Error types for mirra

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source root is missing or is not a directory
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    /// Symlink or alias could not be resolved to a real path
    #[error("Cannot resolve {path}: {source}")]
    Resolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filesystem metadata unavailable
    #[error("Cannot stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory listing unavailable
    #[error("Cannot list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copy, remove or mkdir failure
    #[error("Cannot {op} {path}: {source}")]
    FileOp {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A backup copy failed, so the original was left in place
    #[error("Backup of {path} failed, original kept: {source}")]
    PartialBackupFailure {
        path: PathBuf,
        #[source]
        source: Box<MirrorError>,
    },

    /// Entry path does not live under the root it is rebased from
    #[error("{path} is outside of {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl MirrorError {
    pub(crate) fn stat(path: &Path, source: io::Error) -> Self {
        MirrorError::Stat {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn list(path: &Path, source: io::Error) -> Self {
        MirrorError::List {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn resolution(path: &Path, source: io::Error) -> Self {
        MirrorError::Resolution {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn file_op(op: &'static str, path: &Path, source: io::Error) -> Self {
        MirrorError::FileOp {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Check if a best-effort run may swallow this error and move on
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            MirrorError::NotADirectory { .. } | MirrorError::Config(_)
        )
    }

    /// Path the error is about, when there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            MirrorError::NotADirectory { path }
            | MirrorError::Resolution { path, .. }
            | MirrorError::Stat { path, .. }
            | MirrorError::List { path, .. }
            | MirrorError::FileOp { path, .. }
            | MirrorError::PartialBackupFailure { path, .. }
            | MirrorError::OutsideRoot { path, .. } => Some(path),
            MirrorError::Io(_) | MirrorError::Config(_) => None,
        }
    }
}
