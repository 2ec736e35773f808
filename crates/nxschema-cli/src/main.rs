//! nxschema CLI
//!
//! Converts schema modules into Nx JSON schemas and keeps the generated
//! artifacts in sync with their sources.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::Workspace;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => {
            let workspace = Workspace::detect(cli.root.as_deref())?;
            execute_command(&workspace, cmd)
        }
        None => {
            println!("{} schema sync for Nx workspaces", "nxschema".green().bold());
            println!();
            println!("Run {} for available commands.", "nxschema --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(workspace: &Workspace, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Convert(args) => commands::run_convert(workspace, &args),
        Commands::Sync { dry_run } => commands::run_sync(workspace, dry_run),
        Commands::Check { json } => commands::run_check(workspace, json),
        Commands::PrintConfig {
            declarations,
            output,
        } => commands::run_print_config(workspace, &declarations, output.as_ref()),
    }
}
