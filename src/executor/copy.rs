//! File copy with modification-time preservation

use crate::types::MirrorError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Result of a successful copy
#[derive(Debug)]
pub struct CopyOutcome {
    /// Number of bytes written
    pub bytes: u64,

    /// Set when the destination kept the copy time instead of the source mtime
    pub mtime_error: Option<io::Error>,
}

/// Copy `src` to `dest` through a sibling `.part` file.
///
/// 1. Stream the source into `<dest name>.part`
/// 2. Flush and sync to disk
/// 3. Stamp the source's modification time (failure is not fatal)
/// 4. Rename over the destination
///
/// The parent of `dest` must already exist. A failed copy leaves any
/// previous `dest` untouched and removes the partial file.
pub fn copy_file(src: &Path, dest: &Path) -> Result<CopyOutcome, MirrorError> {
    let src_metadata = fs::metadata(src).map_err(|e| MirrorError::stat(src, e))?;
    let part_path = part_path_for(dest);

    let bytes = match stream(src, &part_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            let _ = fs::remove_file(&part_path);
            return Err(err);
        }
    };

    let mtime_error = src_metadata
        .modified()
        .and_then(|mtime| {
            filetime::set_file_mtime(&part_path, filetime::FileTime::from_system_time(mtime))
        })
        .err();

    if let Err(e) = fs::rename(&part_path, dest) {
        let _ = fs::remove_file(&part_path);
        return Err(MirrorError::file_op("copy to", dest, e));
    }

    Ok(CopyOutcome { bytes, mtime_error })
}

fn stream(src: &Path, part_path: &Path) -> Result<u64, MirrorError> {
    let mut src_file = File::open(src).map_err(|e| MirrorError::file_op("open", src, e))?;
    let mut part_file =
        File::create(part_path).map_err(|e| MirrorError::file_op("create", part_path, e))?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| MirrorError::file_op("read", src, e))?;
        if bytes_read == 0 {
            break;
        }

        part_file
            .write_all(&buffer[..bytes_read])
            .map_err(|e| MirrorError::file_op("write", part_path, e))?;
        total_bytes += bytes_read as u64;
    }

    part_file
        .sync_all()
        .map_err(|e| MirrorError::file_op("flush", part_path, e))?;

    Ok(total_bytes)
}

/// `dir/name.ext` → `dir/name.ext.part`
pub fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".part");
    dest.with_file_name(name)
}
