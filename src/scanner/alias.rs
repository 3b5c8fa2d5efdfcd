//! Alias (shortcut file) expansion during the walk

use super::walker::Mirror;
use crate::config::Config;
use crate::planner::plan_copy_between;
use crate::types::{Entry, MirrorError, Report};
use std::path::{Path, PathBuf};

impl<'a> Mirror<'a> {
    /// Mirror what an alias file points at, in place of the alias itself.
    ///
    /// A directory target is walked as if its contents lived next to the
    /// alias; a file target is copied there. The alias file is never copied.
    ///
    /// The mirror is named after the target, while deletion-sync matches
    /// destination names against the alias file's name. With
    /// `sync_deletions` on, an alias whose name differs from its target's
    /// therefore has its mirror backed up, removed and copied again on every
    /// run, growing the trash each time.
    pub(super) fn expand_alias(
        &self,
        config: &Config,
        alias: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(), MirrorError> {
        let target = self.platform.resolve_alias(alias);
        let Some(target) = self.recover(config, target)? else {
            return Ok(());
        };
        let destination = alias_destination(config, alias, &target);
        let Some(destination) = self.recover(config, destination)? else {
            return Ok(());
        };

        self.reporter.report(Report::Alias {
            path: alias.to_path_buf(),
            target: target.clone(),
        });

        let Some(resolved) = self.recover(config, Entry::stat(&target))? else {
            return Ok(());
        };

        if resolved.kind.is_dir() {
            tracing::debug!(
                alias = %alias.display(),
                resolved = %target.display(),
                destination = %destination.display(),
                "expanding directory alias"
            );
            let nested = config.rebased(&target, &destination);
            return self.enter(&nested, &target, ancestors, |mirror, ancestors| {
                mirror.sync_dir(&nested, &target)?;
                let created = mirror.executor.ensure_dir(&destination, nested.dry_run);
                if mirror.recover(&nested, created)?.is_none() {
                    return Ok(());
                }
                mirror.walk(&nested, &target, ancestors)
            });
        }

        let Some(action) = self.recover(config, plan_copy_between(config, &target, &destination))?
        else {
            return Ok(());
        };
        self.recover(config, self.executor.execute(&action, config.dry_run))?;
        Ok(())
    }
}

/// `destination + dir(alias − source) + basename(target)`
fn alias_destination(config: &Config, alias: &Path, target: &Path) -> Result<PathBuf, MirrorError> {
    let mirror_dir = match alias.parent() {
        Some(parent) => config.destination_for(parent)?,
        None => config.destination.clone(),
    };
    match target.file_name() {
        Some(name) => Ok(mirror_dir.join(name)),
        None => Err(MirrorError::OutsideRoot {
            path: target.to_path_buf(),
            root: config.source.clone(),
        }),
    }
}
