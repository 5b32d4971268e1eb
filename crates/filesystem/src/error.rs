//! Error types for file system operations.

use site_sync_common::PathError;
use thiserror::Error;

/// Errors that can occur during directory enumeration.
///
/// Any of these aborts the whole walk; the walker never returns partial
/// results.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// Root directory does not exist or is not a directory.
    #[error("Root directory not found: {path}")]
    RootNotFound {
        /// The missing root path.
        path: String,
    },

    /// IO error while reading a directory or entry.
    #[error("IO error at {path}: {source}")]
    IoError {
        /// Path where the error occurred.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Path error during relative-key derivation.
    #[error(transparent)]
    Path(#[from] PathError),
}
