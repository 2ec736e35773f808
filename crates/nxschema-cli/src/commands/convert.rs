//! Convert command implementation
//!
//! Gathers declarations from a plugin package and a declaration file, then
//! writes every artifact unconditionally.

use colored::Colorize;

use nxschema_core::{Generator, SyncEngine, generate_all};
use nxschema_meta::{
    Declaration, DeclarationLoader, DeclarationOptions, ResolvedDeclaration,
    ensure_unique_outputs, load_declarations_from_package, merge_declarations,
};

use crate::cli::DeclarationArgs;
use crate::context::Workspace;
use crate::error::{CliError, Result};

/// Collect, merge and resolve the declarations named by `args`.
///
/// Package-derived declarations come first, then the declaration file. The
/// single `--schema` declaration is only used when both yield nothing.
pub fn collect_declarations(
    workspace: &Workspace,
    engine: &SyncEngine,
    args: &DeclarationArgs,
) -> Result<Vec<ResolvedDeclaration>> {
    let loader = DeclarationLoader::new();
    let mut declarations = Vec::new();

    if let Some(package_json) = &args.from_pkg {
        let package_json = workspace.resolve_arg(package_json);
        declarations.extend(load_declarations_from_package(&package_json)?);
    }

    match &args.config {
        Some(config) => {
            let config = workspace.resolve_arg(config);
            if !config.is_file() {
                return Err(CliError::user(format!(
                    "Declaration file {} does not exist",
                    config
                )));
            }
            let dir = config.parent().unwrap_or_else(|| workspace.root.clone());
            declarations.extend(loader.load_file(&config)?.iter().map(|d| d.rebase(&dir)));
        }
        None => {
            let loaded =
                loader.autoload_root_config(&workspace.root, &engine.settings().config_name)?;
            declarations.extend(loaded.iter().map(|d| d.rebase(&workspace.root)));
        }
    }

    if let Some(declaration) = single_declaration(args)? {
        if declarations.is_empty() {
            declarations.push(declaration.rebase(workspace.cwd()));
        } else {
            tracing::warn!(
                schema = %declaration.schema,
                "--schema ignored: declarations were loaded from files"
            );
        }
    }

    let resolved = merge_declarations(&declarations, &workspace.root)
        .iter()
        .map(|declaration| declaration.resolve(&workspace.root))
        .collect::<nxschema_meta::Result<Vec<_>>>()?;
    ensure_unique_outputs(&resolved)?;
    Ok(resolved)
}

/// The declaration spelled out with `--schema` and its companion flags.
fn single_declaration(args: &DeclarationArgs) -> Result<Option<Declaration>> {
    let Some(schema) = &args.schema else {
        return Ok(None);
    };

    let options = DeclarationOptions {
        name: args.name.clone(),
        title: args.title.clone(),
        description: args.description.clone(),
        include_command_default: args.no_command_default.then_some(false),
        additional_properties: args.strict.then_some(false),
    };
    let mut declaration = Declaration::new(schema.as_str()).with_options(options);
    if let Some(export_name) = &args.export_name {
        declaration = declaration.with_export(export_name.as_str());
    }
    if let Some(out_path) = &args.out_path {
        declaration = declaration.with_out_path(out_path.as_str());
    }

    declaration.validate().map_err(CliError::user)?;
    Ok(Some(declaration))
}

/// Run the convert command
pub fn run_convert(workspace: &Workspace, args: &DeclarationArgs) -> Result<()> {
    let engine = SyncEngine::open(workspace.root.clone())?;
    let declarations = collect_declarations(workspace, &engine, args)?;

    if declarations.is_empty() {
        println!(
            "{} No declarations found. Pass {} or add an {}.* file.",
            "WARN".yellow().bold(),
            "--schema".cyan(),
            engine.settings().config_name.cyan()
        );
        return Ok(());
    }

    println!(
        "{} Converting {} schema file{}...",
        "=>".blue().bold(),
        declarations.len(),
        if declarations.len() == 1 { "" } else { "s" }
    );

    let work_dir = workspace.root.to_native();
    let generator = Generator {
        resolver: engine.resolver(),
        converter: engine.converter(),
        formatter: engine.formatter(),
        work_dir: &work_dir,
    };
    let report = generate_all(&generator, &declarations);

    for result in &report.results {
        let artifact = display_path(workspace, &result.artifact);
        match &result.error {
            None => println!("   {} {}", "+".green(), artifact.cyan()),
            Some(e) => println!("   {} {}: {}", "!".red(), artifact.cyan(), e),
        }
    }

    report.ensure_success()?;
    println!("{} Conversion complete.", "OK".green().bold());
    Ok(())
}

/// Show paths inside the workspace relative to its root.
pub(crate) fn display_path(workspace: &Workspace, path: &nxschema_fs::NormalizedPath) -> String {
    path.relative_to(&workspace.root)
        .map(|p| p.to_string())
        .unwrap_or_else(|| path.to_string())
}
