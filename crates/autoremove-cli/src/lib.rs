//! Autoremove CLI library.
//!
//! This library provides the pieces of the `autoremove` command-line tool:
//! argument parsing, document locations, a snapshot-file host, command
//! execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod paths;
pub mod snapshot;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use paths::Paths;
pub use snapshot::SnapshotHost;
