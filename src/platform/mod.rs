//! Platform capabilities: hidden-entry detection and link/alias resolution
//!
//! The walk only talks to the [`Platform`] trait. [`NativePlatform`] picks
//! the implementation for the compilation target; tests substitute their own.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as native;
#[cfg(windows)]
use windows as native;

use crate::types::MirrorError;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem behaviour that differs between platforms
pub trait Platform {
    /// Whether `path` names a hidden entry
    fn is_hidden(&self, path: &Path) -> Result<bool, MirrorError>;

    /// Resolve every symlink level of `path` to the final real path
    fn resolve(&self, path: &Path) -> Result<PathBuf, MirrorError> {
        fs::canonicalize(path).map_err(|e| MirrorError::resolution(path, e))
    }

    /// Whether `path` is an alias file this platform can resolve
    fn is_alias(&self, _path: &Path) -> bool {
        false
    }

    /// Location an alias file points at
    fn resolve_alias(&self, path: &Path) -> Result<PathBuf, MirrorError> {
        Err(MirrorError::resolution(
            path,
            std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "alias files are not supported on this platform",
            ),
        ))
    }
}

/// Capabilities of the platform this binary was built for
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePlatform;

impl Platform for NativePlatform {
    fn is_hidden(&self, path: &Path) -> Result<bool, MirrorError> {
        native::is_hidden(path)
    }

    fn is_alias(&self, path: &Path) -> bool {
        native::is_alias(path)
    }

    fn resolve_alias(&self, path: &Path) -> Result<PathBuf, MirrorError> {
        native::resolve_alias(path)
    }
}

/// Base name starts with a dot
pub fn has_dot_name(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
