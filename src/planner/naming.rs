//! Backup file naming

use chrono::{DateTime, Local};
use std::time::SystemTime;

/// Timestamp layout inserted between stem and extension
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Split a base name into stem and extension.
///
/// The extension starts at the last `.`. A name that is nothing but its
/// extension (`.env`) has no extension.
///
/// - `"example.ext"`  => `("example", ".ext")`
/// - `".example.ext"` => `(".example", ".ext")`
/// - `".example"`     => `(".example", "")`
pub fn split_base(base: &str) -> (&str, &str) {
    match base.rfind('.') {
        Some(0) | None => (base, ""),
        Some(idx) => base.split_at(idx),
    }
}

/// Versioned name for a file last modified at `mtime`:
/// `stem + "_" + YYYY-MM-DD_HHMMSS + ext`, in local time.
///
/// Two versions stamped within the same second get the same name.
pub fn backup_file_name(base: &str, mtime: SystemTime) -> String {
    let (stem, ext) = split_base(base);
    let stamp = DateTime::<Local>::from(mtime).format(BACKUP_TIMESTAMP_FORMAT);
    format!("{}_{}{}", stem, stamp, ext)
}
