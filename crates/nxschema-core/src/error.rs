//! Error types for nxschema-core

use std::path::PathBuf;

/// Result type for nxschema-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing or generating artifacts
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The conversion primitive or dialect layer failed for one artifact
    #[error("Failed to convert schema for {artifact}: {source}")]
    Conversion {
        artifact: PathBuf,
        #[source]
        source: nxschema_convert::Error,
    },

    /// The project graph could not be queried
    #[error("Project graph error: {message}")]
    ProjectGraph { message: String },

    /// Settings file exists but cannot be used
    #[error("Invalid settings at {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    /// One or more artifacts failed during one-shot generation
    #[error("{failed} of {total} artifacts failed to generate")]
    GenerationFailed { failed: usize, total: usize },

    // Transparent wrappers for underlying crate errors
    /// Module resolution error from nxschema-module
    #[error(transparent)]
    Module(#[from] nxschema_module::Error),

    /// Declaration error from nxschema-meta
    #[error(transparent)]
    Meta(#[from] nxschema_meta::Error),

    /// Filesystem error from nxschema-fs
    #[error(transparent)]
    Fs(#[from] nxschema_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn conversion(artifact: impl Into<PathBuf>, source: nxschema_convert::Error) -> Self {
        Self::Conversion {
            artifact: artifact.into(),
            source,
        }
    }
}
