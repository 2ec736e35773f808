//! SyncEngine implementation
//!
//! The SyncEngine reconciles generated artifacts with the schema modules
//! they are generated from, for every declaration found in the workspace.

use chrono::Utc;
use nxschema_convert::NxSchemaConverter;
use nxschema_fs::{NormalizedPath, PathKind, io};
use nxschema_meta::{DeclarationLoader, ResolvedDeclaration, ensure_unique_outputs, merge_declarations};
use nxschema_module::ModuleResolver;
use serde_json::Value;

use crate::artifact::{artifact_matches, expected_artifact, render_artifact};
use crate::format::Formatter;
use crate::graph::{ProjectGraph, ProjectJsonGraph, StaticProjectGraph};
use crate::mode::SyncMode;
use crate::settings::SyncSettings;
use crate::{Error, Result};

use super::marker::Marker;
use super::report::{ActionKind, GeneratorResult, SyncAction, SyncIssue, SyncOutcome};
use super::state::{SyncState, classify};

/// Options for sync runs
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, report what a manual run would change without writing
    /// anything, the marker included. Actions are prefixed with
    /// "[dry-run] Would ...". Ignored in check-only mode.
    pub dry_run: bool,
}

/// Engine for keeping artifacts in sync with their schema modules
///
/// Every run walks the same pipeline: discovery, declaration loading, merge,
/// then per declaration classification and either repair
/// ([`SyncMode::Manual`]) or an issue ([`SyncMode::CheckOnly`]). A completed
/// run ends by writing the marker file.
pub struct SyncEngine {
    /// Workspace root
    root: NormalizedPath,
    settings: SyncSettings,
    graph: Box<dyn ProjectGraph>,
    loader: DeclarationLoader,
    converter: NxSchemaConverter,
}

impl SyncEngine {
    /// Create an engine with default settings and no project graph, so
    /// discovery covers the whole workspace.
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            settings: SyncSettings::default(),
            graph: Box::new(StaticProjectGraph::empty()),
            loader: DeclarationLoader::new(),
            converter: NxSchemaConverter::new(),
        }
    }

    /// Create an engine for an on-disk workspace: settings are read from
    /// `.nxschema/` and projects from `project.json` files.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but is invalid.
    pub fn open(root: NormalizedPath) -> Result<Self> {
        let settings = SyncSettings::load(&root)?;
        let graph = ProjectJsonGraph::new(root.clone());
        Ok(Self::new(root).with_settings(settings).with_graph(graph))
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_graph(mut self, graph: impl ProjectGraph + 'static) -> Self {
        self.graph = Box::new(graph);
        self
    }

    pub fn with_resolver(mut self, resolver: ModuleResolver) -> Self {
        self.loader = DeclarationLoader::with_resolver(resolver);
        self
    }

    pub fn with_converter(mut self, converter: NxSchemaConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Get the workspace root path
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Get the path to the marker file
    pub fn marker_path(&self) -> NormalizedPath {
        self.root.join(&self.settings.marker_name)
    }

    pub fn resolver(&self) -> &ModuleResolver {
        self.loader.resolver()
    }

    pub fn converter(&self) -> &NxSchemaConverter {
        &self.converter
    }

    /// The formatter configured in settings, if any
    pub fn formatter(&self) -> Option<Formatter> {
        self.settings
            .format_command
            .as_deref()
            .and_then(Formatter::from_command)
    }

    /// Find every declaration file under the graph's project roots.
    pub fn discover_declaration_files(&self) -> Result<Vec<NormalizedPath>> {
        let roots: Vec<NormalizedPath> = self
            .graph
            .projects()?
            .into_iter()
            .map(|project| project.root)
            .collect();
        Ok(self.settings.discovery(&self.root).discover(&roots)?)
    }

    /// Load, merge and resolve every declaration in the workspace.
    ///
    /// Strict: the first invalid declaration file or declaration is an error.
    pub fn load_declarations(&self) -> Result<Vec<ResolvedDeclaration>> {
        let files = self.discover_declaration_files()?;
        let mut outcome = SyncOutcome::new(SyncMode::Manual, false);
        self.collect_declarations(&files, SyncMode::Manual, &mut outcome)
    }

    /// Run the engine.
    ///
    /// # Errors
    ///
    /// In [`SyncMode::Manual`] the first failure aborts the run and the
    /// marker file keeps its previous contents.
    ///
    /// In [`SyncMode::CheckOnly`] per-file and per-declaration failures are
    /// issues; only discovery or project-graph failures are returned, after
    /// recording them in the marker.
    pub fn run(&self, mode: SyncMode, options: &SyncOptions) -> Result<SyncOutcome> {
        let dry_run = options.dry_run && mode.repairs();
        tracing::info!(root = %self.root, %mode, dry_run, "starting schema sync");

        let files = match self.discover_declaration_files() {
            Ok(files) => files,
            Err(e) => {
                if mode == SyncMode::CheckOnly {
                    self.record_failure(&e);
                }
                return Err(e);
            }
        };

        let outcome = self.reconcile(&files, mode, dry_run)?;

        tracing::info!("{} issues found", outcome.issue_count());
        for issue in &outcome.issues {
            tracing::info!("Issue: {}", issue);
        }

        if dry_run {
            tracing::info!("dry run, marker not written");
        } else {
            outcome.marker(Utc::now()).write(&self.marker_path())?;
        }
        Ok(outcome)
    }

    /// Manual run: repair everything or fail.
    pub fn sync(&self) -> Result<SyncOutcome> {
        self.run(SyncMode::Manual, &SyncOptions::default())
    }

    /// Check-only run: report without touching artifacts.
    pub fn check(&self) -> Result<SyncOutcome> {
        self.run(SyncMode::CheckOnly, &SyncOptions::default())
    }

    /// The orchestrator's check call: `None` when everything is in sync.
    pub fn check_generator(&self) -> Result<Option<GeneratorResult>> {
        Ok(self.check()?.generator_result())
    }

    fn record_failure(&self, error: &Error) {
        if let Err(write_error) = Marker::Failed(error.to_string()).write(&self.marker_path()) {
            tracing::warn!("could not write marker: {}", write_error);
        }
    }

    fn reconcile(&self, files: &[NormalizedPath], mode: SyncMode, dry_run: bool) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::new(mode, dry_run);
        outcome.declaration_files = files.len();

        let declarations = self.collect_declarations(files, mode, &mut outcome)?;
        outcome.declarations = declarations.len();

        for declaration in &declarations {
            match self.process(declaration, mode, dry_run, &mut outcome) {
                Ok(()) => {}
                Err(e) if mode.repairs() => return Err(e),
                Err(e) => {
                    tracing::warn!(artifact = %declaration.out_path, "declaration failed: {}", e);
                    outcome.issues.push(SyncIssue::ProcessingFailed {
                        artifact: declaration.out_path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Load every file, anchor its declarations at the file's directory,
    /// merge across files and resolve.
    fn collect_declarations(
        &self,
        files: &[NormalizedPath],
        mode: SyncMode,
        outcome: &mut SyncOutcome,
    ) -> Result<Vec<ResolvedDeclaration>> {
        let mut declarations = Vec::new();
        for file in files {
            match self.loader.load_file(file) {
                Ok(loaded) => {
                    let dir = file.parent().unwrap_or_else(|| self.root.clone());
                    declarations.extend(loaded.iter().map(|d| d.rebase(&dir)));
                }
                Err(e) if mode.repairs() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(path = %file, "skipping declaration file: {}", e);
                    outcome.issues.push(SyncIssue::InvalidDeclarationFile {
                        path: file.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let merged = merge_declarations(&declarations, &self.root);
        let mut resolved = Vec::with_capacity(merged.len());
        for declaration in &merged {
            match declaration.resolve(&self.root) {
                Ok(declaration) => resolved.push(declaration),
                Err(e) if mode.repairs() => return Err(e.into()),
                Err(e) => outcome.issues.push(SyncIssue::InvalidDeclarations {
                    message: e.to_string(),
                }),
            }
        }

        match ensure_unique_outputs(&resolved) {
            Ok(()) => {}
            Err(e) if mode.repairs() => return Err(e.into()),
            Err(e) => outcome.issues.push(SyncIssue::InvalidDeclarations {
                message: e.to_string(),
            }),
        }

        tracing::debug!(
            files = files.len(),
            declarations = resolved.len(),
            "resolved declarations"
        );
        Ok(resolved)
    }

    fn process(
        &self,
        declaration: &ResolvedDeclaration,
        mode: SyncMode,
        dry_run: bool,
        outcome: &mut SyncOutcome,
    ) -> Result<()> {
        let artifact = &declaration.out_path;
        let source_exists = io::probe(&declaration.schema)? != PathKind::Missing;
        let artifact_exists = io::probe(artifact)? != PathKind::Missing;

        // Conversion is only needed to compare, or to write
        let expected = if source_exists && (artifact_exists || mode.repairs()) {
            Some(expected_artifact(self.resolver(), &self.converter, declaration)?)
        } else {
            None
        };
        let actual = if source_exists && artifact_exists {
            Some(io::read_text(artifact)?)
        } else {
            None
        };

        let state = classify(source_exists, artifact_exists, || match (&expected, &actual) {
            (Some(expected), Some(actual)) => artifact_matches(expected, actual),
            _ => false,
        });
        let Some(state) = state else {
            tracing::debug!(schema = %declaration.schema, "neither source nor artifact exists, skipping");
            return Ok(());
        };
        tracing::debug!(artifact = %artifact, %state, "classified declaration");

        match (state, mode) {
            (SyncState::InSync, _) => {}
            (SyncState::Missing, SyncMode::CheckOnly) => {
                outcome.issues.push(SyncIssue::Missing {
                    artifact: artifact.clone(),
                });
            }
            (SyncState::Stale, SyncMode::CheckOnly) => {
                outcome.issues.push(SyncIssue::Stale {
                    artifact: artifact.clone(),
                });
            }
            (SyncState::Orphaned, SyncMode::CheckOnly) => {
                outcome.issues.push(SyncIssue::Extra {
                    artifact: artifact.clone(),
                });
            }
            (SyncState::Missing | SyncState::Stale, SyncMode::Manual) => {
                let document = match expected {
                    Some(document) => document,
                    None => expected_artifact(self.resolver(), &self.converter, declaration)?,
                };
                let kind = if state == SyncState::Missing {
                    ActionKind::Generated
                } else {
                    ActionKind::Regenerated
                };
                if !dry_run {
                    self.write_artifact(artifact, &document)?;
                }
                self.record_action(outcome, kind, artifact, dry_run);
            }
            (SyncState::Orphaned, SyncMode::Manual) => {
                if !dry_run {
                    io::remove_file(artifact)?;
                }
                self.record_action(outcome, ActionKind::Removed, artifact, dry_run);
            }
        }
        Ok(())
    }

    fn write_artifact(&self, artifact: &NormalizedPath, document: &Value) -> Result<()> {
        io::write_text(artifact, &render_artifact(document)?)?;
        if let Some(formatter) = self.formatter() {
            formatter.format(artifact, &self.root.to_native());
        }
        Ok(())
    }

    fn record_action(
        &self,
        outcome: &mut SyncOutcome,
        kind: ActionKind,
        artifact: &NormalizedPath,
        dry_run: bool,
    ) {
        let action = SyncAction {
            kind,
            artifact: artifact.clone(),
            dry_run,
        };
        tracing::info!("{}", action);
        outcome.actions.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ProjectNode;
    use tempfile::TempDir;

    struct FailingGraph;

    impl ProjectGraph for FailingGraph {
        fn projects(&self) -> Result<Vec<ProjectNode>> {
            Err(Error::ProjectGraph {
                message: "daemon unavailable".into(),
            })
        }
    }

    #[test]
    fn test_marker_path_follows_settings() {
        let settings = SyncSettings {
            marker_name: "custom.txt".into(),
            ..Default::default()
        };
        let engine = SyncEngine::new(NormalizedPath::new("/ws")).with_settings(settings);
        assert_eq!(engine.marker_path().as_str(), "/ws/custom.txt");
    }

    #[test]
    fn test_graph_failure_in_check_mode_writes_marker() {
        let temp = TempDir::new().unwrap();
        let engine = SyncEngine::new(NormalizedPath::new(temp.path())).with_graph(FailingGraph);

        assert!(engine.check().is_err());
        let marker = std::fs::read_to_string(engine.marker_path().to_native()).unwrap();
        assert_eq!(
            marker,
            "Sync generator failed: Project graph error: daemon unavailable\n"
        );
    }

    #[test]
    fn test_graph_failure_in_manual_mode_leaves_marker() {
        let temp = TempDir::new().unwrap();
        let engine = SyncEngine::new(NormalizedPath::new(temp.path())).with_graph(FailingGraph);

        assert!(engine.sync().is_err());
        assert!(!engine.marker_path().exists());
    }

    #[test]
    fn test_formatter_from_settings() {
        let engine = SyncEngine::new(NormalizedPath::new("/ws"));
        assert!(engine.formatter().is_none());

        let settings = SyncSettings {
            format_command: Some(vec!["prettier".into(), "--write".into()]),
            ..Default::default()
        };
        assert!(engine.with_settings(settings).formatter().is_some());
    }
}
