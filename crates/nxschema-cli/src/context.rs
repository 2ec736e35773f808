//! Workspace context for a CLI invocation
//!
//! Paths given on the command line are relative to the current directory;
//! the workspace root anchors everything the engine discovers.

use std::path::Path;

use nxschema_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Where the command runs and which workspace it operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Canonical workspace root
    pub root: NormalizedPath,
    cwd: NormalizedPath,
}

impl Workspace {
    /// Detect the workspace from `--root`, falling back to the current directory.
    pub fn detect(root: Option<&Path>) -> Result<Self> {
        let cwd = NormalizedPath::new(std::env::current_dir()?);
        Self::from_parts(root, cwd)
    }

    fn from_parts(root: Option<&Path>, cwd: NormalizedPath) -> Result<Self> {
        // Canonical, like `root`
        let cwd = cwd.canonicalize().unwrap_or(cwd);
        let requested = match root {
            Some(root) => NormalizedPath::new(root).absolutize(&cwd),
            None => cwd.clone(),
        };
        if !requested.is_dir() {
            return Err(CliError::user(format!(
                "Workspace root {} is not a directory",
                requested
            )));
        }
        let root = requested.canonicalize()?;
        tracing::debug!(root = %root, "using workspace root");
        Ok(Self { root, cwd })
    }

    /// Anchor a command-line path at the current directory.
    pub fn resolve_arg(&self, path: &Path) -> NormalizedPath {
        NormalizedPath::new(path).absolutize(&self.cwd)
    }

    pub fn cwd(&self) -> &NormalizedPath {
        &self.cwd
    }
}
