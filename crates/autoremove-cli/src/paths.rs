//! Location of the documents the CLI works on.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};

/// Ignore flags document name inside the data directory.
pub const STATE_FILE: &str = "ignore.json";

/// Snapshot file name used when no snapshot path is given.
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Resolved document paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Configuration document
    pub config: PathBuf,
    /// Ignore flags document
    pub state: PathBuf,
    /// Host snapshot
    pub snapshot: PathBuf,
}

impl Paths {
    /// Default data directory (`~/.autoremove`).
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".autoremove"))
    }

    /// Lay out the documents inside `dir`.
    pub fn in_dir(dir: &Path, config_file: &str, snapshot: Option<&Path>) -> Self {
        Self {
            config: dir.join(config_file),
            state: dir.join(STATE_FILE),
            snapshot: snapshot.map_or_else(|| dir.join(SNAPSHOT_FILE), Path::to_path_buf),
        }
    }

    /// Resolve from command-line flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => Self::default_dir()?,
        };
        Ok(Self::in_dir(&dir, &cli.config_file, cli.snapshot.as_deref()))
    }
}
