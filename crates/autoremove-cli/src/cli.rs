//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Autoremove CLI - Keep a host registry within its configured size.
#[derive(Debug, Parser)]
#[command(name = "autoremove")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory holding the configuration and ignore documents
    #[arg(short, long, global = true, env = "AUTOREMOVE_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file name inside the data directory (.toml or .json)
    #[arg(long, global = true, default_value = "autoremove.json")]
    pub config_file: String,

    /// Host snapshot file
    #[arg(short, long, global = true, env = "AUTOREMOVE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what a pass would do, without acting
    Plan,

    /// Run a single pass
    Run,

    /// Run passes on the configured interval
    Watch(WatchArgs),

    /// Show or change configuration
    Config(ConfigArgs),

    /// Exempt items from removal
    Ignore(IdsArgs),

    /// Clear the ignore flag on items
    Unignore(IdsArgs),

    /// List ignored items
    Ignored,

    /// List the metrics rules can use
    Rules,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Stop after this many passes
    #[arg(short = 'n', long)]
    pub cycles: Option<usize>,

    /// Seconds to wait before the first pass
    #[arg(long, default_value = "5")]
    pub start_delay: u64,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Set one or more keys
    Set {
        /// Assignments such as `max_seeds=50` or `trackers=["private"]`
        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Restore defaults
    Reset,
}

/// Item ids.
#[derive(Debug, Parser)]
pub struct IdsArgs {
    /// Item ids
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["autoremove", "run"]);
        assert!(matches!(cli.command, Command::Run));
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.config_file, "autoremove.json");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["autoremove", "plan", "--format", "json", "-s", "snap.json", "-v"]);
        assert!(matches!(cli.command, Command::Plan));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.snapshot, Some(PathBuf::from("snap.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::parse_from(["autoremove", "config", "set", "max_seeds=10", "enabled=true"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Set { assignments },
            }) => assert_eq!(assignments, vec!["max_seeds=10", "enabled=true"]),
            _ => panic!("Expected config set"),
        }
    }

    #[test]
    fn test_ignore_requires_ids() {
        assert!(Cli::try_parse_from(["autoremove", "ignore"]).is_err());
        let cli = Cli::parse_from(["autoremove", "ignore", "a", "b"]);
        assert!(matches!(cli.command, Command::Ignore(IdsArgs { ids }) if ids.len() == 2));
    }

    #[test]
    fn test_watch_defaults() {
        let cli = Cli::parse_from(["autoremove", "watch", "-n", "3"]);
        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.cycles, Some(3));
                assert_eq!(args.start_delay, 5);
            }
            _ => panic!("Expected watch"),
        }
    }
}
