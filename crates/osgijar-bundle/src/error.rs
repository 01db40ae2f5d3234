//! Error types for bundle operations.

use osgijar_core::PackagingError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a packaging pass.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failure while walking a class root.
    #[error("Failed to scan class root: {0}")]
    Walk(#[from] walkdir::Error),

    /// The packaging engine rejected the configuration.
    #[error("Packaging engine failed: {0}")]
    Engine(String),

    /// The manifest snapshot could not be read or written.
    #[error("Manifest snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest text is not well formed.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Build description error.
    #[error(transparent)]
    Config(#[from] PackagingError),
}
