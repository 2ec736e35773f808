//! Print-config command implementation

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use nxschema_core::SyncEngine;
use nxschema_fs::ConfigStore;
use nxschema_meta::ResolvedDeclaration;

use super::convert::{collect_declarations, display_path};
use crate::cli::DeclarationArgs;
use crate::context::Workspace;
use crate::error::Result;

/// The configuration convert would run with
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrintedConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    from_pkg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<String>,
    declarations: &'a [ResolvedDeclaration],
}

/// Run the print-config command
pub fn run_print_config(
    workspace: &Workspace,
    args: &DeclarationArgs,
    output: Option<&PathBuf>,
) -> Result<()> {
    let engine = SyncEngine::open(workspace.root.clone())?;
    let declarations = collect_declarations(workspace, &engine, args)?;

    let printed = PrintedConfig {
        from_pkg: args
            .from_pkg
            .as_ref()
            .map(|p| workspace.resolve_arg(p).to_string()),
        config: args
            .config
            .as_ref()
            .map(|p| workspace.resolve_arg(p).to_string()),
        declarations: &declarations,
    };

    match output {
        Some(output) => {
            // The extension picks the format: .json, .yaml/.yml or .toml
            let output = workspace.resolve_arg(output);
            ConfigStore::new().save(&output, &printed)?;
            println!(
                "{} Wrote configuration to {}",
                "OK".green().bold(),
                display_path(workspace, &output).cyan()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&printed)?),
    }
    Ok(())
}
