//! Bounded-concurrency sync engine for site-sync.
//!
//! This crate implements the core of a sync run against any
//! [`StorageClient`] backend:
//!
//! - Cache-control resolution from ordered glob rules
//! - A bounded work queue capping in-flight storage operations
//! - Per-file upload with transparent permanent-redirect recovery
//! - Bucket reconciliation (delete what the run did not upload)
//! - The orchestrator tying a run together
//!
//! # Example
//!
//! ```ignore
//! use site_sync_storage::{sync_directory, SyncOptions};
//! use site_sync_storage_s3::{S3StorageClient, S3StorageSettings};
//!
//! let client = S3StorageClient::new(S3StorageSettings::default()).await?;
//! let options = SyncOptions {
//!     bucket: "my-site".to_string(),
//!     delete: true,
//!     ..SyncOptions::default()
//! };
//! let summary = sync_directory(&client, "dist".as_ref(), &options).await?;
//! ```

pub mod cache_control;
mod error;
pub mod queue;
pub mod reconcile;
pub mod redirect;
pub mod sync;
mod traits;
mod types;
pub mod upload;

pub use cache_control::CacheControlMap;
pub use error::StorageError;
pub use queue::WorkQueue;
pub use reconcile::reconcile;
pub use redirect::redirect_region;
pub use sync::{sync_directory, SyncError};
pub use traits::{ObjectPage, StorageClient};
pub use types::{SyncOptions, SyncSummary, UploadJob};
pub use upload::upload_file;
