//! Command-line arguments

use super::{Config, ConfigFile};
use crate::types::MirrorError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How report records are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per action
    #[default]
    Text,
    /// One JSON object per action
    Json,
}

/// Mirror a directory tree, keeping versioned backups of what it replaces
#[derive(Debug, Parser)]
#[command(name = "mirra", version, about)]
pub struct Cli {
    /// Source directory
    pub source: Option<PathBuf>,

    /// Destination directory
    pub destination: Option<PathBuf>,

    /// Backup root for overwritten and deleted files [default: <DESTINATION>.trash]
    #[arg(short, long)]
    pub trash: Option<PathBuf>,

    /// Show what would be done without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Include hidden files and directories
    #[arg(short = 'a', long)]
    pub hidden: bool,

    /// Skip files whose size and modification time are unchanged
    #[arg(short, long)]
    pub modified: bool,

    /// Follow symbolic links (always on, kept for compatibility)
    #[arg(short, long)]
    pub link: bool,

    /// Report errors and keep going instead of aborting
    #[arg(short, long)]
    pub ignore_errors: bool,

    /// Back up destination files before overwriting them
    #[arg(short, long)]
    pub backup: bool,

    /// Delete destination entries missing from the source (after backing them up)
    #[arg(short, long)]
    pub sync: bool,

    /// Output format for the action log
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase diagnostic logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Read defaults from a TOML file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl TryFrom<Cli> for Config {
    type Error = MirrorError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let source = cli
            .source
            .or(file.source)
            .ok_or_else(|| MirrorError::Config("source directory is required".to_string()))?;
        let destination = cli.destination.or(file.destination).ok_or_else(|| {
            MirrorError::Config("destination directory is required".to_string())
        })?;
        let trash = match cli.trash.or(file.trash) {
            Some(trash) => trash,
            None => default_trash(&destination)?,
        };

        let config = Config {
            source,
            destination,
            trash,
            dry_run: cli.dry_run || file.dry_run,
            include_hidden: cli.hidden || file.hidden,
            compare_modified: cli.modified || file.modified,
            follow_links: cli.link || file.link,
            best_effort: cli.ignore_errors || file.ignore_errors,
            backup_on_overwrite: cli.backup || file.backup,
            sync_deletions: cli.sync || file.sync,
        }
        .absolutize()?;

        config.validate()?;
        Ok(config)
    }
}

fn default_trash(destination: &std::path::Path) -> Result<PathBuf, MirrorError> {
    let name = destination.file_name().ok_or_else(|| {
        MirrorError::Config(format!(
            "cannot derive a trash directory from {:?}, pass --trash",
            destination
        ))
    })?;
    let mut trash_name = name.to_os_string();
    trash_name.push(".trash");
    Ok(destination.with_file_name(trash_name))
}
