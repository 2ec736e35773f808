//! Error types for nxschema-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declaration file loaded but its contents are not a valid declaration set
    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// A single declaration cannot be resolved
    #[error("Invalid declaration for '{schema}': {message}")]
    InvalidDeclaration { schema: String, message: String },

    /// Two or more declarations write the same artifact
    #[error("outPath must be unique across all declarations. Found duplicates in: {paths}")]
    DuplicateOutput { paths: String },

    /// An artifact path names a schema module of another declaration
    #[error("outPath {path} would overwrite a declared schema module")]
    OutputIsSchema { path: String },

    /// Walking the workspace failed
    #[error("Discovery failed under {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error(transparent)]
    Module(#[from] nxschema_module::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] nxschema_fs::Error),
}

impl Error {
    pub fn invalid_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            message: message.into(),
        }
    }
}
