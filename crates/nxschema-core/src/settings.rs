//! Workspace settings for the sync engine
//!
//! Settings live in `.nxschema/settings.{toml,json,yaml,yml}` under the
//! workspace root. Every key is optional:
//!
//! ```toml
//! config_name = "nxschema.config"
//! marker_name = ".out-of-sync.txt"
//! tool_package = "packages/nxschema"
//! exclude = ["fixtures", "e2e/mocks"]
//! format_command = ["prettier", "--write"]
//! ```

use crate::{Error, Result};
use nxschema_fs::{ConfigStore, NormalizedPath};
use nxschema_meta::{DEFAULT_CONFIG_NAME, Discovery};
use serde::{Deserialize, Serialize};

/// Directory under the workspace root holding the settings file
pub const SETTINGS_DIR: &str = ".nxschema";

/// Marker file written at the workspace root after every completed run
pub const DEFAULT_MARKER_NAME: &str = ".out-of-sync.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    /// Base name of declaration files
    pub config_name: String,

    /// File name of the marker written at the workspace root
    pub marker_name: String,

    /// Directory of the tool's own package, never searched for declarations
    pub tool_package: Option<String>,

    /// Extra discovery exclusions: bare directory names or root-relative paths
    pub exclude: Vec<String>,

    /// Program and arguments run on each written artifact; the artifact path
    /// is appended
    pub format_command: Option<Vec<String>>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            marker_name: DEFAULT_MARKER_NAME.to_string(),
            tool_package: None,
            exclude: Vec::new(),
            format_command: None,
        }
    }
}

impl SyncSettings {
    /// Load settings for the workspace at `root`, falling back to defaults
    /// when no settings file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be parsed, or
    /// if it names an empty `config_name` or `marker_name`.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let store = ConfigStore::new();
        let Some(path) = store.find(&root.join(SETTINGS_DIR), "settings") else {
            tracing::debug!(root = %root, "no settings file, using defaults");
            return Ok(Self::default());
        };

        let settings: Self = store.load(&path)?;
        settings.validate(&path)?;
        tracing::debug!(path = %path, "loaded settings");
        Ok(settings)
    }

    fn validate(&self, path: &NormalizedPath) -> Result<()> {
        let invalid = |message: &str| Error::InvalidSettings {
            path: path.to_native(),
            message: message.to_string(),
        };
        if self.config_name.trim().is_empty() {
            return Err(invalid("config_name must not be empty"));
        }
        if self.marker_name.trim().is_empty() || self.marker_name.contains('/') {
            return Err(invalid("marker_name must be a plain file name"));
        }
        if self
            .format_command
            .as_ref()
            .is_some_and(|cmd| cmd.first().is_none_or(|p| p.trim().is_empty()))
        {
            return Err(invalid("format_command must name a program"));
        }
        Ok(())
    }

    /// A [`Discovery`] for `root` configured with these settings.
    pub fn discovery(&self, root: &NormalizedPath) -> Discovery {
        let mut discovery = Discovery::new(root.clone()).with_config_name(&self.config_name);
        for entry in &self.exclude {
            discovery = discovery.exclude(entry);
        }
        if let Some(tool_package) = &self.tool_package {
            discovery = discovery.exclude(&absolute_exclusion(tool_package, root));
        }
        discovery
    }
}

/// Tool package paths are always treated as paths, even without a slash.
fn absolute_exclusion(entry: &str, root: &NormalizedPath) -> String {
    NormalizedPath::new(entry).absolutize(root).to_string()
}
