//! Error types for nxschema-module

use std::path::PathBuf;

/// Result type for nxschema-module operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving a module export
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing exists at the module path
    #[error("Module '{path}' does not exist")]
    ModuleNotFound { path: PathBuf },

    /// Something exists at the module path, but it is not a regular file
    #[error("Expected module '{path}' to be a file")]
    NotAFile { path: PathBuf },

    /// Every applicable loader failed to parse the module
    #[error("Failed to load module '{path}': {message}")]
    ModuleParse { path: PathBuf, message: String },

    /// The module loaded but the export is absent or falsy
    #[error("Export '{export}' not found in module '{path}'")]
    ExportNotFound { path: PathBuf, export: String },

    /// Filesystem error from nxschema-fs
    #[error(transparent)]
    Fs(#[from] nxschema_fs::Error),
}

impl Error {
    /// The module path this error refers to, when it names one
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::ModuleNotFound { path }
            | Self::NotAFile { path }
            | Self::ModuleParse { path, .. }
            | Self::ExportNotFound { path, .. } => Some(path),
            Self::Fs(_) => None,
        }
    }
}
