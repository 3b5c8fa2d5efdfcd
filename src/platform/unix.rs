//! Unix: dot-files are hidden, no alias file format

use crate::types::MirrorError;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

pub(super) fn is_hidden(path: &Path) -> Result<bool, MirrorError> {
    Ok(super::has_dot_name(path))
}

pub(super) fn is_alias(_path: &Path) -> bool {
    false
}

pub(super) fn resolve_alias(path: &Path) -> Result<PathBuf, MirrorError> {
    Err(MirrorError::resolution(
        path,
        Error::new(
            ErrorKind::Unsupported,
            "shortcut files are only resolved on Windows",
        ),
    ))
}
