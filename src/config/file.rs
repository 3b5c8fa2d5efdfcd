//! TOML configuration file

use crate::types::MirrorError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from a `--config` file.
///
/// Every key is optional; command-line values take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub trash: Option<PathBuf>,
    pub dry_run: bool,
    pub hidden: bool,
    pub modified: bool,
    pub link: bool,
    pub ignore_errors: bool,
    pub backup: bool,
    pub sync: bool,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, MirrorError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MirrorError::Config(format!("Cannot read config file {:?}: {}", path, e))
        })?;
        Self::parse(&content)
            .map_err(|e| MirrorError::Config(format!("Invalid config file {:?}: {}", path, e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
