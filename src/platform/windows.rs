//! Windows: hidden attribute bit and `.lnk` shortcut files

use crate::types::MirrorError;
use std::fs;
use std::io::{Error, ErrorKind};
use std::os::windows::fs::MetadataExt;
use std::path::{Path, PathBuf};

const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

pub(super) fn is_hidden(path: &Path) -> Result<bool, MirrorError> {
    if super::has_dot_name(path) {
        return Ok(true);
    }
    let metadata = fs::symlink_metadata(path).map_err(|e| MirrorError::stat(path, e))?;
    Ok(metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
}

pub(super) fn is_alias(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("lnk"))
        .unwrap_or(false)
}

/// Base path recorded in the shortcut joined with its path suffix
pub(super) fn resolve_alias(path: &Path) -> Result<PathBuf, MirrorError> {
    let link = lnk::ShellLink::open(path).map_err(|e| {
        MirrorError::resolution(path, Error::new(ErrorKind::InvalidData, format!("{:?}", e)))
    })?;

    let info = link.link_info().as_ref().ok_or_else(|| {
        MirrorError::resolution(
            path,
            Error::new(ErrorKind::InvalidData, "shortcut has no link info"),
        )
    })?;
    let base = info.local_base_path().as_ref().ok_or_else(|| {
        MirrorError::resolution(
            path,
            Error::new(ErrorKind::InvalidData, "shortcut has no local base path"),
        )
    })?;

    Ok(PathBuf::from(base).join(info.common_path_suffix()))
}
