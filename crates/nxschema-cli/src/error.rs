//! Error types for nxschema-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from nxschema-core
    #[error(transparent)]
    Core(#[from] nxschema_core::Error),

    /// Error from nxschema-meta
    #[error(transparent)]
    Meta(#[from] nxschema_meta::Error),

    /// Error from nxschema-fs
    #[error(transparent)]
    Fs(#[from] nxschema_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_displays_message() {
        assert_eq!(CliError::user("3 issues found").to_string(), "3 issues found");
    }

    #[test]
    fn test_meta_error_is_transparent() {
        let err: CliError = nxschema_meta::Error::DuplicateOutput {
            paths: "a.json, a.json".into(),
        }
        .into();
        assert!(err.to_string().contains("a.json, a.json"));
    }
}
