//! Report - the user-facing record of every decision

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One record handed to a [`Reporter`].
///
/// A record is emitted before the action it describes is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verb", rename_all = "lowercase")]
pub enum Report {
    Mkdir { path: PathBuf },
    Copy { from: PathBuf, to: PathBuf },
    Backup { path: PathBuf, backup: PathBuf },
    Sync { source: PathBuf, destination: PathBuf },
    Remove { path: PathBuf },
    Skip { from: PathBuf, to: PathBuf },
    Alias { path: PathBuf, target: PathBuf },
    Error { message: String },
}

impl Report {
    pub fn mkdir(path: &Path) -> Self {
        Report::Mkdir {
            path: path.to_path_buf(),
        }
    }

    pub fn copy(from: &Path, to: &Path) -> Self {
        Report::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        }
    }

    pub fn backup(path: &Path, backup: &Path) -> Self {
        Report::Backup {
            path: path.to_path_buf(),
            backup: backup.to_path_buf(),
        }
    }

    pub fn remove(path: &Path) -> Self {
        Report::Remove {
            path: path.to_path_buf(),
        }
    }

    pub fn error(err: &dyn std::error::Error) -> Self {
        Report::Error {
            message: err.to_string(),
        }
    }

    /// Verb of this record
    pub fn verb(&self) -> &'static str {
        match self {
            Report::Mkdir { .. } => "mkdir",
            Report::Copy { .. } => "copy",
            Report::Backup { .. } => "backup",
            Report::Sync { .. } => "sync",
            Report::Remove { .. } => "remove",
            Report::Skip { .. } => "skip",
            Report::Alias { .. } => "alias",
            Report::Error { .. } => "error",
        }
    }

    /// Verb followed by operands; an error is its message alone
    pub fn fields(&self) -> Vec<String> {
        let show = |p: &Path| p.display().to_string();
        match self {
            Report::Mkdir { path } | Report::Remove { path } => {
                vec![self.verb().to_string(), show(path)]
            }
            Report::Copy { from, to } | Report::Skip { from, to } => {
                vec![self.verb().to_string(), show(from), show(to)]
            }
            Report::Backup { path, backup } => {
                vec![self.verb().to_string(), show(path), show(backup)]
            }
            Report::Sync {
                source,
                destination,
            } => vec![self.verb().to_string(), show(source), show(destination)],
            Report::Alias { path, target } => {
                vec![self.verb().to_string(), show(path), show(target)]
            }
            Report::Error { message } => vec![message.clone()],
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields().join(" "))
    }
}

/// Sink for report records.
///
/// `report` may block until the record has been accepted.
pub trait Reporter {
    fn report(&self, record: Report);
}

impl<F> Reporter for F
where
    F: Fn(Report),
{
    fn report(&self, record: Report) {
        self(record)
    }
}

/// Reporter that keeps every record in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    records: Mutex<Vec<Report>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far
    pub fn records(&self) -> Vec<Report> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Records with the given verb
    pub fn with_verb(&self, verb: &str) -> Vec<Report> {
        self.records()
            .into_iter()
            .filter(|r| r.verb() == verb)
            .collect()
    }

    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        for record in self.records() {
            stats.record(&record);
        }
        stats
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, record: Report) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

/// Counters derived from a report stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub dirs_created: usize,
    pub copied: usize,
    pub skipped: usize,
    pub backed_up: usize,
    pub removed: usize,
    pub errors: usize,
}

impl RunStats {
    pub fn record(&mut self, report: &Report) {
        match report {
            Report::Mkdir { .. } => self.dirs_created += 1,
            Report::Copy { .. } => self.copied += 1,
            Report::Skip { .. } => self.skipped += 1,
            Report::Backup { .. } => self.backed_up += 1,
            Report::Remove { .. } => self.removed += 1,
            Report::Error { .. } => self.errors += 1,
            Report::Sync { .. } | Report::Alias { .. } => {}
        }
    }
}
