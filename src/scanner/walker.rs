//! Depth-first mirror walk

use crate::config::Config;
use crate::executor::Executor;
use crate::planner::{plan_copy, plan_sync};
use crate::platform::Platform;
use crate::types::{Entry, EntryKind, MirrorError, Report, Reporter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Walks a source tree and mirrors it entry by entry.
///
/// Everything is sequential: one directory, one child, one action at a time.
/// Every per-entry error is reported exactly once; whether it then stops the
/// run depends on `Config::best_effort`.
pub struct Mirror<'a> {
    pub(super) platform: &'a dyn Platform,
    pub(super) reporter: &'a dyn Reporter,
    pub(super) executor: Executor<'a>,
}

impl<'a> Mirror<'a> {
    pub fn new(platform: &'a dyn Platform, reporter: &'a dyn Reporter) -> Self {
        Self {
            platform,
            reporter,
            executor: Executor::new(reporter),
        }
    }

    /// Mirror `config.source` into `config.destination`.
    ///
    /// A missing, unreadable or non-directory source root is returned without
    /// being reported, regardless of `best_effort`. A missing root counts as
    /// not a directory.
    pub fn run(&self, config: &Config) -> Result<(), MirrorError> {
        let root = match Entry::stat(&config.source) {
            Err(MirrorError::Stat { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                return Err(MirrorError::NotADirectory {
                    path: config.source.clone(),
                });
            }
            root => root?,
        };
        if !root.kind.is_dir() {
            return Err(MirrorError::NotADirectory {
                path: config.source.clone(),
            });
        }
        let canonical_root = self.platform.resolve(&config.source)?;

        tracing::info!(
            source = %config.source.display(),
            destination = %config.destination.display(),
            dry_run = config.dry_run,
            "mirror started"
        );

        self.sync_dir(config, &config.source)?;
        if self
            .recover(
                config,
                self.executor.ensure_dir(&config.destination, config.dry_run),
            )?
            .is_none()
        {
            return Ok(());
        }

        let mut ancestors = vec![canonical_root];
        self.walk(config, &config.source, &mut ancestors)
    }

    /// Retire the destination-only children of `source_dir`'s mirror
    pub fn sync_dir(&self, config: &Config, source_dir: &Path) -> Result<(), MirrorError> {
        let plan = match self.recover(config, plan_sync(config, source_dir))? {
            Some(Some(plan)) => plan,
            _ => return Ok(()),
        };

        self.reporter.report(Report::Sync {
            source: plan.source_dir.clone(),
            destination: plan.destination_dir.clone(),
        });
        tracing::debug!(
            dir = %plan.destination_dir.display(),
            retirements = plan.steps.len(),
            "deletion sync"
        );

        for step in plan.steps {
            if let Some(action) = self.recover(config, step)? {
                self.recover(config, self.executor.execute(&action, config.dry_run))?;
            }
        }
        Ok(())
    }

    /// Mirror every child of `dir`, recursing into directories.
    ///
    /// `ancestors` holds the canonical paths of the directories currently
    /// being walked, outermost first.
    pub fn walk(
        &self,
        config: &Config,
        dir: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(), MirrorError> {
        let listing = fs::read_dir(dir).map_err(|e| MirrorError::list(dir, e));
        let Some(listing) = self.recover(config, listing)? else {
            return Ok(());
        };

        for child in listing {
            let child = child.map_err(|e| MirrorError::list(dir, e));
            if let Some(child) = self.recover(config, child)? {
                self.visit(config, &child.path(), ancestors)?;
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        config: &Config,
        path: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(), MirrorError> {
        tracing::trace!(path = %path.display(), "visit");

        let Some(entry) = self.recover(config, Entry::stat(path))? else {
            return Ok(());
        };
        let Some(hidden) = self.recover(config, self.platform.is_hidden(path))? else {
            return Ok(());
        };
        if hidden && !config.include_hidden {
            tracing::trace!(path = %path.display(), "hidden, skipped");
            return Ok(());
        }

        let entry = if !entry.kind.is_dir() && self.platform.is_alias(path) {
            entry.into_alias()
        } else {
            entry
        };
        match entry.kind {
            EntryKind::Directory | EntryKind::SymlinkToDirectory => {
                return self.descend(config, path, ancestors);
            }
            EntryKind::AliasFile => return self.expand_alias(config, &entry.path, ancestors),
            EntryKind::File | EntryKind::SymlinkToFile => {}
        }

        let Some(action) = self.recover(config, plan_copy(config, self.platform, path))? else {
            return Ok(());
        };
        tracing::debug!(action = action.action_name(), path = %path.display(), "planned");
        self.recover(config, self.executor.execute(&action, config.dry_run))?;
        Ok(())
    }

    fn descend(
        &self,
        config: &Config,
        dir: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(), MirrorError> {
        self.enter(config, dir, ancestors, |mirror, ancestors| {
            mirror.sync_dir(config, dir)?;

            let destination = config.destination_for(dir);
            let Some(destination) = mirror.recover(config, destination)? else {
                return Ok(());
            };
            let created = mirror.executor.ensure_dir(&destination, config.dry_run);
            if mirror.recover(config, created)?.is_none() {
                return Ok(());
            }

            mirror.walk(config, dir, ancestors)
        })
    }

    /// Run `body` with `dir` pushed on the ancestor stack.
    ///
    /// A directory already on the stack is a symlink cycle and is reported
    /// as a resolution error instead.
    pub(super) fn enter<F>(
        &self,
        config: &Config,
        dir: &Path,
        ancestors: &mut Vec<PathBuf>,
        body: F,
    ) -> Result<(), MirrorError>
    where
        F: FnOnce(&Self, &mut Vec<PathBuf>) -> Result<(), MirrorError>,
    {
        let Some(canonical) = self.recover(config, self.platform.resolve(dir))? else {
            return Ok(());
        };

        if ancestors.contains(&canonical) {
            let cycle = MirrorError::resolution(
                dir,
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("directory cycle through {}", canonical.display()),
                ),
            );
            self.recover::<()>(config, Err(cycle))?;
            return Ok(());
        }

        ancestors.push(canonical);
        let result = body(self, ancestors);
        ancestors.pop();
        result
    }

    /// Report a failed step and decide whether the run goes on.
    ///
    /// `Ok(None)` means the error was swallowed and the caller moves on to
    /// the next sibling.
    pub(super) fn recover<T>(
        &self,
        config: &Config,
        result: Result<T, MirrorError>,
    ) -> Result<Option<T>, MirrorError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                self.reporter.report(Report::error(&err));
                if config.best_effort && err.is_recoverable() {
                    tracing::warn!(path = ?err.path(), error = %err, "continuing after error");
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::NativePlatform;
    use crate::types::MemoryReporter;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let base = temp.path().to_path_buf();
        let config = Config {
            source: base.join("src"),
            destination: base.join("dst"),
            trash: base.join("trash"),
            ..Config::default()
        };
        fs::create_dir_all(&config.source).expect("create src");
        (temp, config)
    }

    #[test]
    fn test_source_must_be_directory() {
        let (_temp, config) = setup();
        let file = config.source.join("plain.txt");
        fs::write(&file, b"x").expect("write file");
        let config = Config {
            source: file,
            ..config
        };

        let reporter = MemoryReporter::new();
        let result = Mirror::new(&NativePlatform, &reporter).run(&config);
        assert!(matches!(result, Err(MirrorError::NotADirectory { .. })));
        assert!(reporter.records().is_empty());
    }

    #[test]
    fn test_missing_source_is_not_a_directory_even_in_best_effort() {
        let (_temp, config) = setup();
        let missing = config.source.join("missing");
        let config = Config {
            source: missing.clone(),
            best_effort: true,
            ..config
        };

        let reporter = MemoryReporter::new();
        let result = Mirror::new(&NativePlatform, &reporter).run(&config);
        match result {
            Err(MirrorError::NotADirectory { path }) => assert_eq!(path, missing),
            other => panic!("expected NotADirectory, got {:?}", other),
        }
        assert!(reporter.records().is_empty());
        assert!(!config.destination.exists());
    }

    #[test]
    fn test_nested_tree_is_mirrored_parent_first() {
        let (_temp, config) = setup();
        fs::create_dir_all(config.source.join("a/b")).expect("create a/b");
        fs::write(config.source.join("a/b/deep.txt"), b"deep").expect("write deep");

        let reporter = MemoryReporter::new();
        Mirror::new(&NativePlatform, &reporter)
            .run(&config)
            .expect("run");

        assert_eq!(
            fs::read(config.destination.join("a/b/deep.txt")).expect("read deep"),
            b"deep"
        );
        let records = reporter.records();
        let mkdirs: Vec<&Report> = records.iter().filter(|r| r.verb() == "mkdir").collect();
        assert_eq!(
            mkdirs,
            vec![
                &Report::mkdir(&config.destination),
                &Report::mkdir(&config.destination.join("a")),
                &Report::mkdir(&config.destination.join("a/b")),
            ]
        );
        assert_eq!(records.last().map(Report::verb), Some("copy"));
    }

    #[test]
    fn test_hidden_entries_skipped_unless_included() {
        let (_temp, config) = setup();
        fs::write(config.source.join(".secret"), b"s").expect("write hidden file");
        fs::create_dir(config.source.join(".cache")).expect("create hidden dir");
        fs::write(config.source.join(".cache/blob"), b"b").expect("write blob");
        fs::write(config.source.join("visible.txt"), b"v").expect("write visible");

        let reporter = MemoryReporter::new();
        let mirror = Mirror::new(&NativePlatform, &reporter);
        mirror.run(&config).expect("run");
        assert!(config.destination.join("visible.txt").exists());
        assert!(!config.destination.join(".secret").exists());
        assert!(!config.destination.join(".cache").exists());

        let config = Config {
            include_hidden: true,
            ..config
        };
        mirror.run(&config).expect("run with hidden");
        assert!(config.destination.join(".secret").exists());
        assert!(config.destination.join(".cache/blob").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_cycle_is_reported_not_followed() {
        let (_temp, config) = setup();
        fs::create_dir(config.source.join("loop")).expect("create loop");
        std::os::unix::fs::symlink(&config.source, config.source.join("loop/back"))
            .expect("create cycle link");
        fs::write(config.source.join("file.txt"), b"f").expect("write file");

        let reporter = MemoryReporter::new();
        let config = Config {
            best_effort: true,
            ..config
        };
        Mirror::new(&NativePlatform, &reporter)
            .run(&config)
            .expect("best effort run");

        assert_eq!(reporter.with_verb("error").len(), 1);
        assert!(config.destination.join("file.txt").exists());
        assert!(config.destination.join("loop").is_dir());
        assert!(!config.destination.join("loop/back").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinked_directory_is_followed() {
        let (temp, config) = setup();
        let outside = temp.path().join("outside");
        fs::create_dir(&outside).expect("create outside");
        fs::write(outside.join("inner.txt"), b"i").expect("write inner");
        std::os::unix::fs::symlink(&outside, config.source.join("linked"))
            .expect("create dir link");

        let reporter = MemoryReporter::new();
        Mirror::new(&NativePlatform, &reporter)
            .run(&config)
            .expect("run");

        let copied = config.destination.join("linked/inner.txt");
        assert_eq!(fs::read(&copied).expect("read copied"), b"i");
        assert!(!fs::symlink_metadata(config.destination.join("linked"))
            .expect("stat mirror")
            .file_type()
            .is_symlink());
    }
}
