//! Error types for packaging configuration

use thiserror::Error;

/// Result type alias for configuration operations
pub type PackagingResult<T> = Result<T, PackagingError>;

/// Error type for configuration-side operations
#[derive(Error, Debug)]
pub enum PackagingError {
    /// Build description could not be read or is malformed
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A directive cannot be represented in a manifest
    #[error("invalid instruction {name}: {reason}")]
    InvalidInstruction { name: String, reason: String },
}

impl PackagingError {
    /// Returns a stable numeric code, used when reporting to a host
    pub fn error_code(&self) -> u32 {
        match self {
            PackagingError::ConfigError(_) => 1,
            PackagingError::SerializationError(_) => 2,
            PackagingError::InvalidInstruction { .. } => 3,
        }
    }
}

impl From<serde_json::Error> for PackagingError {
    fn from(err: serde_json::Error) -> Self {
        PackagingError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for PackagingError {
    fn from(err: toml::de::Error) -> Self {
        PackagingError::ConfigError(err.to_string())
    }
}
