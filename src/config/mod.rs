//! Configuration management

mod cli;
mod file;

pub use cli::{Cli, OutputFormat};
pub use file::ConfigFile;

use crate::types::MirrorError;
use std::path::{Component, Path, PathBuf};

/// Configuration of one mirror run.
///
/// Treated as an immutable value: recursive sub-runs derive their own copy
/// through [`Config::rebased`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// Root under which overwritten and retired content is preserved
    pub trash: PathBuf,

    /// Report actions without touching the filesystem
    pub dry_run: bool,

    /// Walk entries the platform considers hidden
    pub include_hidden: bool,

    /// Skip files whose size and mtime already match
    pub compare_modified: bool,

    /// Accepted for compatibility, symlinks are always followed
    pub follow_links: bool,

    /// Report per-entry errors and continue with the next sibling
    pub best_effort: bool,

    /// Back up existing destination files before overwriting them
    pub backup_on_overwrite: bool,

    /// Retire destination entries missing from the source
    pub sync_deletions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            trash: PathBuf::new(),
            dry_run: false,
            include_hidden: false,
            compare_modified: false,
            follow_links: false,
            best_effort: false,
            backup_on_overwrite: false,
            sync_deletions: false,
        }
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), MirrorError> {
        let roots = [
            ("source", &self.source),
            ("destination", &self.destination),
            ("trash", &self.trash),
        ];

        for (name, root) in roots {
            if root.as_os_str().is_empty() {
                return Err(MirrorError::Config(format!("{} path is empty", name)));
            }
            if !root.is_absolute() {
                return Err(MirrorError::Config(format!(
                    "{} path must be absolute: {:?}",
                    name, root
                )));
            }
        }

        for (i, (name_a, a)) in roots.iter().enumerate() {
            for (name_b, b) in roots.iter().skip(i + 1) {
                if a == b {
                    return Err(MirrorError::Config(format!(
                        "{} and {} cannot be the same: {:?}",
                        name_a, name_b, a
                    )));
                }
                if a.starts_with(b) || b.starts_with(a) {
                    return Err(MirrorError::Config(format!(
                        "{} ({:?}) and {} ({:?}) cannot be nested",
                        name_a, a, name_b, b
                    )));
                }
            }
        }

        Ok(())
    }

    /// Make every root absolute against the current working directory
    pub fn absolutize(mut self) -> Result<Self, MirrorError> {
        let cwd = std::env::current_dir()?;
        for root in [&mut self.source, &mut self.destination, &mut self.trash] {
            if !root.as_os_str().is_empty() {
                *root = normalize(&cwd.join(&*root));
            }
        }
        Ok(self)
    }

    /// Copy of this config mirroring `source` into `destination`.
    ///
    /// The trash root moves by the same offset as the destination so that
    /// backups keep the layout of the outer run.
    pub fn rebased(&self, source: &Path, destination: &Path) -> Self {
        let trash = rebase(destination, &self.destination, &self.trash)
            .unwrap_or_else(|_| self.trash.clone());
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            trash,
            ..self.clone()
        }
    }

    /// Mirror location of a path under the source root
    pub fn destination_for(&self, source_path: &Path) -> Result<PathBuf, MirrorError> {
        rebase(source_path, &self.source, &self.destination)
    }

    /// Trash directory matching a directory under the destination root
    pub fn trash_dir_for(&self, destination_dir: &Path) -> Result<PathBuf, MirrorError> {
        rebase(destination_dir, &self.destination, &self.trash)
    }
}

/// Replace the `from` prefix of `path` with `to`
pub fn rebase(path: &Path, from: &Path, to: &Path) -> Result<PathBuf, MirrorError> {
    let relative = path
        .strip_prefix(from)
        .map_err(|_| MirrorError::OutsideRoot {
            path: path.to_path_buf(),
            root: from.to_path_buf(),
        })?;
    if relative.as_os_str().is_empty() {
        Ok(to.to_path_buf())
    } else {
        Ok(to.join(relative))
    }
}

// Lexical cleanup of `.` and `..`; does not touch the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
