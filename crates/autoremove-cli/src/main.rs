//! Autoremove CLI - Command-line interface for the autoremove engine.

use autoremove_cli::commands;
use autoremove_cli::{Cli, Command, Formatter, Paths};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> autoremove_cli::Result<()> {
    let paths = Paths::from_cli(&cli)?;
    let formatter = Formatter::new(cli.format, !cli.no_color);

    let service = || commands::open_service(&paths);

    let output = match cli.command {
        Command::Plan => commands::execute_plan(&paths, &formatter)?,
        Command::Run => commands::execute_run(&service()?, &formatter)?,
        Command::Watch(args) => commands::execute_watch(args, service()?, &formatter).await?,
        Command::Config(args) => commands::execute_config(args, &service()?, &formatter)?,
        Command::Ignore(args) => commands::execute_ignore(&args.ids, true, &service()?, &formatter)?,
        Command::Unignore(args) => commands::execute_ignore(&args.ids, false, &service()?, &formatter)?,
        Command::Ignored => commands::execute_ignored(&service()?, &formatter)?,
        Command::Rules => commands::execute_rules(&service()?, &formatter)?,
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
