//! Error types for nxschema-convert

/// Result type for nxschema-convert operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a schema
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The value handed to the primitive is not a valid validator definition
    #[error("Invalid validator definition: {message}")]
    InvalidValidator { message: String },

    /// The primitive produced something the dialect layer cannot work with
    #[error("Schema conversion failed: {message}")]
    Conversion { message: String },
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValidator {
            message: message.into(),
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }
}
