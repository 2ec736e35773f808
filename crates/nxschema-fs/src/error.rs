//! Error types for nxschema-fs

use crate::ConfigFormat;
use std::path::PathBuf;

/// Result type for nxschema-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in nxschema-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file does not parse as the format its extension names
    #[error("Invalid {format} in {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    #[error("Cannot write {path} as {format}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    /// The extension names no supported format
    #[error("Unsupported file format '.{extension}' (expected toml, json, yaml or yml)")]
    UnsupportedFormat { extension: String },

    /// Another process holds the advisory lock on a file being written
    #[error("Could not lock {path} for writing")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
