//! Workspace discovery of declaration files

use crate::{Error, Result};
use nxschema_fs::NormalizedPath;
use walkdir::WalkDir;

/// Base name shared by every declaration file
pub const DEFAULT_CONFIG_NAME: &str = "nxschema.config";

/// Supported declaration file extensions, in priority order
pub const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml"];

/// Directory names never descended into
pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &["node_modules", "dist", "tmp", "coverage", "target", ".git"];

/// Finds declaration files under a workspace root.
///
/// Root-level declaration files are never returned: they configure the CLI
/// itself, not a project.
#[derive(Debug, Clone)]
pub struct Discovery {
    root: NormalizedPath,
    config_name: String,
    excluded_dirs: Vec<String>,
    excluded_paths: Vec<NormalizedPath>,
}

impl Discovery {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            excluded_paths: Vec::new(),
        }
    }

    pub fn with_config_name(mut self, config_name: impl Into<String>) -> Self {
        self.config_name = config_name.into();
        self
    }

    /// Exclude a location from discovery.
    ///
    /// A bare name (`fixtures`) excludes every directory with that name; a
    /// path (`libs/nxschema`) excludes that subtree, relative to the root.
    pub fn exclude(mut self, entry: &str) -> Self {
        let trimmed = entry.trim_end_matches('/');
        if trimmed.contains('/') || trimmed.contains('\\') {
            self.excluded_paths
                .push(NormalizedPath::new(trimmed).absolutize(&self.root));
        } else if !trimmed.is_empty() {
            self.excluded_dirs.push(trimmed.to_string());
        }
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// Whether `file_name` is `<config-name>.<supported extension>`.
    pub fn is_config_file_name(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.config_name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext))
    }

    fn is_excluded(&self, path: &NormalizedPath, is_dir: bool) -> bool {
        if is_dir
            && path
                .file_name()
                .is_some_and(|name| self.excluded_dirs.iter().any(|d| d == name))
        {
            return true;
        }
        self.excluded_paths.iter().any(|p| path.starts_with(p))
    }

    /// Walk `search_roots` (or the whole workspace when empty) and collect
    /// declaration files, deduplicated and sorted lexically.
    ///
    /// Search roots are relative to the workspace root. Roots that do not
    /// exist are skipped; unreadable entries are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if the workspace root is not a directory.
    pub fn discover(&self, search_roots: &[NormalizedPath]) -> Result<Vec<NormalizedPath>> {
        if !self.root.is_dir() {
            return Err(Error::Discovery {
                path: self.root.to_native(),
                message: "workspace root is not a directory".to_string(),
            });
        }

        let roots: Vec<NormalizedPath> = if search_roots.is_empty() {
            vec![self.root.clone()]
        } else {
            search_roots.iter().map(|r| r.absolutize(&self.root)).collect()
        };

        let mut found = Vec::new();
        for search_root in &roots {
            if !search_root.is_dir() {
                tracing::warn!(path = %search_root, "skipping missing project root");
                continue;
            }
            if self.is_excluded(search_root, true) && search_root != &self.root {
                tracing::debug!(path = %search_root, "skipping excluded project root");
                continue;
            }

            let walker = WalkDir::new(search_root.to_native())
                .min_depth(1)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| {
                    let path = NormalizedPath::new(e.path());
                    !self.is_excluded(&path, e.file_type().is_dir())
                });

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("failed to access entry in {}: {}", search_root, e);
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(file_name) = entry.file_name().to_str() else {
                    continue;
                };
                if !self.is_config_file_name(file_name) {
                    continue;
                }
                let path = NormalizedPath::new(entry.path());
                if path.parent().as_ref() == Some(&self.root) {
                    tracing::debug!(path = %path, "skipping root-level declaration file");
                    continue;
                }
                found.push(path);
            }
        }

        found.sort();
        found.dedup();
        tracing::debug!(count = found.len(), root = %self.root, "discovered declaration files");
        Ok(found)
    }
}

/// Find the root-level declaration file, trying extensions in priority order.
pub fn find_root_config(root: &NormalizedPath, config_name: &str) -> Option<NormalizedPath> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| root.join(&format!("{config_name}.{ext}")))
        .find(|candidate| candidate.is_file())
}
