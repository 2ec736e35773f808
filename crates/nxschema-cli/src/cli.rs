//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// nxschema - Keep generated Nx JSON schemas in sync with their sources
#[derive(Parser, Debug)]
#[command(name = "nxschema")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true, env = "NXSCHEMA_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Convert schema modules and write their artifacts
    ///
    /// Declarations come from --from-pkg and the declaration file (--config,
    /// or the root-level nxschema.config.* file). When neither yields any,
    /// the single declaration given by --schema is used.
    ///
    /// Examples:
    ///   nxschema convert
    ///   nxschema convert --config tools/nxschema.config.yaml
    ///   nxschema convert --from-pkg packages/plugin/package.json
    ///   nxschema convert --schema src/schema.yaml --out-path src/schema.json
    Convert(DeclarationArgs),

    /// Regenerate stale and missing artifacts and remove orphaned ones
    Sync {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Report artifacts that are out of sync without changing them
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved declarations that convert would use
    PrintConfig {
        #[command(flatten)]
        declarations: DeclarationArgs,

        /// Write the configuration to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Where convert and print-config take their declarations from
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationArgs {
    /// Declaration file to load instead of the root-level one
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// package.json of a build plugin to derive declarations from
    #[arg(long)]
    pub from_pkg: Option<PathBuf>,

    /// Schema module for a single declaration
    #[arg(long)]
    pub schema: Option<String>,

    /// Export to read from the schema module
    #[arg(long, requires = "schema")]
    pub export_name: Option<String>,

    /// Artifact path for the single declaration
    #[arg(long, requires = "schema")]
    pub out_path: Option<String>,

    /// Schema name (`$id`)
    #[arg(long, requires = "schema")]
    pub name: Option<String>,

    /// Schema title
    #[arg(long, requires = "schema")]
    pub title: Option<String>,

    /// Schema description
    #[arg(long, requires = "schema")]
    pub description: Option<String>,

    /// Do not add the positional default to a `command` property
    #[arg(long, requires = "schema")]
    pub no_command_default: bool,

    /// Reject properties not declared in the schema
    #[arg(long, requires = "schema")]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from::<[&str; 0], &str>([]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_global_flags_after_command() {
        let cli = Cli::parse_from(["nxschema", "check", "-v", "--root", "ws"]);
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("ws")));
        assert_eq!(cli.command, Some(Commands::Check { json: false }));
    }

    #[test]
    fn parse_sync_dry_run() {
        let cli = Cli::parse_from(["nxschema", "sync", "--dry-run"]);
        assert_eq!(cli.command, Some(Commands::Sync { dry_run: true }));
    }

    #[test]
    fn parse_convert_single_declaration() {
        let cli = Cli::parse_from([
            "nxschema",
            "convert",
            "--schema",
            "src/schema.yaml",
            "--export-name",
            "options",
            "--out-path",
            "src/schema.json",
            "--title",
            "Build Options",
            "--no-command-default",
            "--strict",
        ]);
        let Some(Commands::Convert(args)) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.schema.as_deref(), Some("src/schema.yaml"));
        assert_eq!(args.export_name.as_deref(), Some("options"));
        assert_eq!(args.out_path.as_deref(), Some("src/schema.json"));
        assert_eq!(args.title.as_deref(), Some("Build Options"));
        assert!(args.no_command_default);
        assert!(args.strict);
        assert!(args.config.is_none());
    }

    #[test]
    fn parse_print_config_output() {
        let cli = Cli::parse_from([
            "nxschema",
            "print-config",
            "--config",
            "custom.json",
            "--output",
            "out/config.json",
        ]);
        let Some(Commands::PrintConfig {
            declarations,
            output,
        }) = cli.command
        else {
            panic!("expected print-config");
        };
        assert_eq!(declarations.config, Some(PathBuf::from("custom.json")));
        assert_eq!(output, Some(PathBuf::from("out/config.json")));
    }

    #[test]
    fn single_declaration_flags_require_schema() {
        let result = Cli::try_parse_from(["nxschema", "convert", "--title", "T"]);
        assert!(result.is_err());
    }
}
