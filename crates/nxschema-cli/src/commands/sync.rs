//! Sync and check command implementations
//!
//! Both run the sync engine over the workspace; only sync touches artifacts.

use colored::Colorize;

use nxschema_core::{ActionKind, SyncEngine, SyncMode, SyncOptions, SyncOutcome};

use crate::context::Workspace;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// Regenerates stale and missing artifacts and removes orphaned ones.
pub fn run_sync(workspace: &Workspace, dry_run: bool) -> Result<()> {
    println!("{} Synchronizing schema artifacts...", "=>".blue().bold());

    let engine = SyncEngine::open(workspace.root.clone())?;
    let outcome = engine.run(SyncMode::Manual, &SyncOptions { dry_run })?;

    print_counts(&outcome);
    if outcome.actions.is_empty() {
        println!("{} Already synchronized. No changes needed.", "OK".green().bold());
    } else {
        let header = if dry_run { "Would apply:" } else { "Synchronization complete:" };
        println!("{} {}", "OK".green().bold(), header);
        for action in &outcome.actions {
            let icon = match action.kind {
                ActionKind::Generated => "+".green(),
                ActionKind::Regenerated => "~".yellow(),
                ActionKind::Removed => "-".red(),
            };
            println!("   {} {}", icon, action);
        }
    }
    Ok(())
}

/// Run the check command
///
/// Fails when any artifact is out of sync so that scripts can gate on it.
pub fn run_check(workspace: &Workspace, json: bool) -> Result<()> {
    let engine = SyncEngine::open(workspace.root.clone())?;
    let outcome = engine.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{} Checking schema artifacts...", "=>".blue().bold());
        print_counts(&outcome);
        if outcome.has_issues() {
            println!("{} Schemas are out of sync:", "DRIFTED".red().bold());
            for issue in &outcome.issues {
                println!("   {} {}", "!".red(), issue);
            }
            println!();
            println!("Run {} to repair.", "nxschema sync".cyan());
        } else {
            println!("{} All schema artifacts are in sync.", "OK".green().bold());
        }
    }

    if outcome.has_issues() {
        return Err(CliError::user(format!(
            "{} issue{} found",
            outcome.issue_count(),
            if outcome.issue_count() == 1 { "" } else { "s" }
        )));
    }
    Ok(())
}

fn print_counts(outcome: &SyncOutcome) {
    println!(
        "   {} declaration file{}, {} declaration{}",
        outcome.declaration_files,
        if outcome.declaration_files == 1 { "" } else { "s" },
        outcome.declarations,
        if outcome.declarations == 1 { "" } else { "s" }
    );
}
