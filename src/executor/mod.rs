//! Executor module for file operations
//!
//! Every effect is reported before it happens. In dry-run mode the report
//! is all that happens.

pub mod copy;
pub mod trash;

use crate::types::{Action, MirrorError, Report, Reporter};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub use copy::{copy_file, CopyOutcome};
pub use trash::backup_tree;

/// Applies actions to the filesystem
pub struct Executor<'a> {
    reporter: &'a dyn Reporter,
    // Directories announced during a dry run, so they are announced once.
    planned_dirs: RefCell<HashSet<PathBuf>>,
}

impl<'a> Executor<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self {
            reporter,
            planned_dirs: RefCell::new(HashSet::new()),
        }
    }

    /// Report and (unless `dry_run`) perform one action.
    ///
    /// Removals only happen after their backup copy succeeded; a failed
    /// backup is returned as `PartialBackupFailure` with the original intact.
    pub fn execute(&self, action: &Action, dry_run: bool) -> Result<(), MirrorError> {
        tracing::debug!(action = action.action_name(), path = %action.target().display(), dry_run);

        match action {
            Action::Skip { from, to } => {
                self.reporter.report(Report::Skip {
                    from: from.clone(),
                    to: to.clone(),
                });
                Ok(())
            }
            Action::MakeDirectory(path) => self.make_dir(path, dry_run),
            Action::Copy { from, to } => self.copy(from, to, dry_run),
            Action::BackupThenCopy {
                from,
                to,
                backup_to,
            } => {
                self.reporter.report(Report::backup(to, backup_to));
                self.copy(to, backup_to, dry_run)
                    .map_err(|e| partial_backup(to, e))?;
                self.copy(from, to, dry_run)
            }
            Action::BackupThenRemove { path, backup_to } => {
                self.reporter.report(Report::backup(path, backup_to));
                self.copy(path, backup_to, dry_run)
                    .map_err(|e| partial_backup(path, e))?;

                self.reporter.report(Report::remove(path));
                if dry_run {
                    return Ok(());
                }
                fs::remove_file(path).map_err(|e| MirrorError::file_op("remove", path, e))
            }
            Action::BackupThenRemoveSubtree { path, backup_to } => {
                self.reporter.report(Report::backup(path, backup_to));
                backup_tree(self, path, backup_to, dry_run)
                    .map_err(|e| partial_backup(path, e))?;

                self.reporter.report(Report::remove(path));
                if dry_run {
                    return Ok(());
                }
                fs::remove_dir_all(path).map_err(|e| MirrorError::file_op("remove", path, e))
            }
        }
    }

    /// Execute `MakeDirectory(dir)` unless `dir` is present or already announced
    pub fn ensure_dir(&self, dir: &Path, dry_run: bool) -> Result<(), MirrorError> {
        if dir.is_dir() || self.planned_dirs.borrow().contains(dir) {
            return Ok(());
        }
        self.execute(&Action::MakeDirectory(dir.to_path_buf()), dry_run)
    }

    fn make_dir(&self, dir: &Path, dry_run: bool) -> Result<(), MirrorError> {
        self.reporter.report(Report::mkdir(dir));
        if dry_run {
            self.planned_dirs.borrow_mut().insert(dir.to_path_buf());
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| MirrorError::file_op("create directory", dir, e))
    }

    /// Copy one file, creating the destination's parent first.
    ///
    /// A modification time that cannot be restored is reported, not returned.
    pub(crate) fn copy(&self, from: &Path, to: &Path, dry_run: bool) -> Result<(), MirrorError> {
        if let Some(parent) = to.parent() {
            self.ensure_dir(parent, dry_run)?;
        }

        self.reporter.report(Report::copy(from, to));
        if dry_run {
            return Ok(());
        }

        let outcome = copy_file(from, to)?;
        tracing::trace!(bytes = outcome.bytes, to = %to.display(), "copied");
        if let Some(err) = outcome.mtime_error {
            tracing::warn!(path = %to.display(), error = %err, "modification time not preserved");
            self.reporter.report(Report::Error {
                message: format!(
                    "Cannot set modification time of {}: {}",
                    to.display(),
                    err
                ),
            });
        }
        Ok(())
    }
}

fn partial_backup(path: &Path, source: MirrorError) -> MirrorError {
    MirrorError::PartialBackupFailure {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemoryReporter;
    use tempfile::TempDir;

    fn verbs(reporter: &MemoryReporter) -> Vec<&'static str> {
        reporter.records().iter().map(Report::verb).collect()
    }

    #[test]
    fn test_copy_creates_parent_as_own_action() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("out/deep/a.txt");
        fs::write(&src, b"x").expect("write src");

        let reporter = MemoryReporter::new();
        let executor = Executor::new(&reporter);
        executor
            .execute(
                &Action::Copy {
                    from: src.clone(),
                    to: dest.clone(),
                },
                false,
            )
            .expect("execute copy");

        assert_eq!(verbs(&reporter), vec!["mkdir", "copy"]);
        assert_eq!(
            reporter.records()[0],
            Report::mkdir(&temp_dir.path().join("out/deep"))
        );
        assert_eq!(fs::read(&dest).expect("read dest"), b"x");
    }

    #[test]
    fn test_backup_then_copy_preserves_previous_version() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src.txt");
        let dest = temp_dir.path().join("dst/a.txt");
        let backup = temp_dir.path().join("trash/a_2024-01-01_000000.txt");
        fs::create_dir_all(dest.parent().expect("parent")).expect("create dst");
        fs::write(&src, b"new").expect("write src");
        fs::write(&dest, b"old").expect("write dest");

        let reporter = MemoryReporter::new();
        Executor::new(&reporter)
            .execute(
                &Action::BackupThenCopy {
                    from: src,
                    to: dest.clone(),
                    backup_to: backup.clone(),
                },
                false,
            )
            .expect("execute");

        assert_eq!(fs::read(&backup).expect("read backup"), b"old");
        assert_eq!(fs::read(&dest).expect("read dest"), b"new");
        assert_eq!(verbs(&reporter), vec!["backup", "mkdir", "copy", "copy"]);
    }

    #[test]
    fn test_backup_then_remove() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let stale = temp_dir.path().join("dst/stale.txt");
        let backup = temp_dir.path().join("trash/stale_x.txt");
        fs::create_dir_all(stale.parent().expect("parent")).expect("create dst");
        fs::write(&stale, b"keep a copy").expect("write stale");

        let reporter = MemoryReporter::new();
        Executor::new(&reporter)
            .execute(
                &Action::BackupThenRemove {
                    path: stale.clone(),
                    backup_to: backup.clone(),
                },
                false,
            )
            .expect("execute");

        assert!(!stale.exists());
        assert_eq!(fs::read(&backup).expect("read backup"), b"keep a copy");
        assert_eq!(verbs(&reporter), vec!["backup", "mkdir", "copy", "remove"]);
    }

    #[test]
    fn test_failed_backup_blocks_removal() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let stale = temp_dir.path().join("dst/stale.txt");
        let trash = temp_dir.path().join("trash");
        fs::create_dir_all(stale.parent().expect("parent")).expect("create dst");
        fs::create_dir_all(&trash).expect("create trash");
        fs::write(&stale, b"precious").expect("write stale");

        // A regular file where the backup's parent directory should go.
        fs::write(trash.join("blocked"), b"").expect("write blocker");
        let backup = trash.join("blocked/stale_x.txt");

        let reporter = MemoryReporter::new();
        let result = Executor::new(&reporter).execute(
            &Action::BackupThenRemove {
                path: stale.clone(),
                backup_to: backup,
            },
            false,
        );

        assert!(matches!(
            result,
            Err(MirrorError::PartialBackupFailure { .. })
        ));
        assert_eq!(fs::read(&stale).expect("original kept"), b"precious");
        assert!(reporter.with_verb("remove").is_empty());
    }

    #[test]
    fn test_backup_then_remove_subtree() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let old = temp_dir.path().join("dst/old");
        fs::create_dir_all(old.join("inner")).expect("create old");
        fs::write(old.join("inner/file.txt"), b"f").expect("write inner");
        let backup = temp_dir.path().join("trash/old_x");

        let reporter = MemoryReporter::new();
        Executor::new(&reporter)
            .execute(
                &Action::BackupThenRemoveSubtree {
                    path: old.clone(),
                    backup_to: backup.clone(),
                },
                false,
            )
            .expect("execute");

        assert!(!old.exists());
        assert_eq!(
            fs::read(backup.join("inner/file.txt")).expect("read backup"),
            b"f"
        );
        assert_eq!(reporter.records().first(), Some(&Report::backup(&old, &backup)));
        assert_eq!(reporter.records().last(), Some(&Report::remove(&old)));
    }

    #[test]
    fn test_dry_run_reports_without_touching_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let stale = temp_dir.path().join("dst/stale.txt");
        fs::create_dir_all(stale.parent().expect("parent")).expect("create dst");
        fs::write(&stale, b"s").expect("write stale");

        let reporter = MemoryReporter::new();
        let executor = Executor::new(&reporter);
        let actions = [
            Action::MakeDirectory(temp_dir.path().join("new_dir")),
            Action::Copy {
                from: temp_dir.path().join("does-not-matter"),
                to: temp_dir.path().join("out/x"),
            },
            Action::BackupThenRemove {
                path: stale.clone(),
                backup_to: temp_dir.path().join("trash/stale_x.txt"),
            },
        ];
        for action in &actions {
            executor.execute(action, true).expect("dry run never fails");
        }

        assert!(stale.exists());
        assert!(!temp_dir.path().join("new_dir").exists());
        assert!(!temp_dir.path().join("out").exists());
        assert!(!temp_dir.path().join("trash").exists());
        assert_eq!(
            verbs(&reporter),
            vec!["mkdir", "mkdir", "copy", "backup", "mkdir", "copy", "remove"]
        );
    }

    #[test]
    fn test_ensure_dir_makes_each_directory_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let fresh = temp_dir.path().join("a/b");

        for dry_run in [true, false] {
            let reporter = MemoryReporter::new();
            let executor = Executor::new(&reporter);
            executor.ensure_dir(&fresh, dry_run).expect("ensure dir");
            executor.ensure_dir(&fresh, dry_run).expect("ensure dir again");
            executor
                .ensure_dir(temp_dir.path(), dry_run)
                .expect("existing dir");

            assert_eq!(reporter.records(), vec![Report::mkdir(&fresh)]);
            assert_eq!(fresh.is_dir(), !dry_run);
        }
    }

    #[test]
    fn test_ensure_dir_failure_is_file_op_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"").expect("write blocker");

        let reporter = MemoryReporter::new();
        let result = Executor::new(&reporter).ensure_dir(&blocker.join("sub"), false);

        assert!(matches!(
            result,
            Err(MirrorError::FileOp { op: "create directory", .. })
        ));
        assert_eq!(verbs(&reporter), vec!["mkdir"]);
    }

    #[test]
    fn test_skip_is_reported_only() {
        let reporter = MemoryReporter::new();
        Executor::new(&reporter)
            .execute(
                &Action::Skip {
                    from: PathBuf::from("/src/a"),
                    to: PathBuf::from("/dst/a"),
                },
                false,
            )
            .expect("skip");
        assert_eq!(verbs(&reporter), vec!["skip"]);
    }
}
