//! Error types for storage operations.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Put failed for reasons other than a recoverable redirect.
    #[error("Failed to upload s3://{bucket}/{key}: {message}")]
    Upload {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Underlying error message.
        message: String,
    },

    /// Delete failed.
    #[error("Failed to delete s3://{bucket}/{key}: {message}")]
    Delete {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Underlying error message.
        message: String,
    },

    /// Listing failed.
    #[error("Failed to list s3://{bucket}/{prefix}: {message}")]
    List {
        /// Bucket name.
        bucket: String,
        /// Key prefix.
        prefix: String,
        /// Underlying error message.
        message: String,
    },

    /// The bucket must be addressed through a different regional endpoint.
    ///
    /// Internal: the upload executor consumes this, rebinds the client, and
    /// retries once. It is never surfaced to callers directly.
    #[error("Permanent redirect to endpoint {}", endpoint.as_deref().unwrap_or("<legacy>"))]
    Redirect {
        /// Endpoint host named by the redirect, if any. Absence implies the
        /// legacy us-east-1 endpoint.
        endpoint: Option<String>,
    },

    /// Local I/O error.
    #[error("I/O error for {path}: {message}")]
    IoError {
        /// Path where the error occurred.
        path: String,
        /// Error message.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },
}
