//! Orchestration of a full sync pass.

use std::collections::HashSet;
use std::path::Path;

use site_sync_common::{normalize_prefix, DEFAULT_CONCURRENCY};
use site_sync_filesystem::{walk, FileSystemError, WalkedFile};
use thiserror::Error;

use crate::cache_control::CacheControlMap;
use crate::error::StorageError;
use crate::queue::WorkQueue;
use crate::reconcile::reconcile;
use crate::traits::StorageClient;
use crate::types::{SyncOptions, SyncSummary, UploadJob};
use crate::upload::upload_file;

/// Errors surfaced by a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Directory enumeration failed (fatal, nothing was uploaded for the
    /// aborted walk).
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// A storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Run one sync pass: walk, upload, optionally reconcile.
///
/// The prefix is normalized (empty stays empty, non-empty gets exactly one
/// trailing separator), concurrency defaults to
/// [`DEFAULT_CONCURRENCY`] when unset, and the cache-control mapping
/// defaults to [`CacheControlMap::default_table`].
///
/// Uploads are fail-fast: the first upload error aborts the run, and files
/// already uploaded stay in the bucket (there is no cross-file atomicity).
/// Reconciliation runs strictly after the upload phase and only when
/// `options.delete` is set; it never deletes a key uploaded by this run.
///
/// # Arguments
/// * `client` - Storage client
/// * `root` - Local directory to upload
/// * `options` - Run configuration
///
/// # Returns
/// Uploaded and deleted object counts.
///
/// # Errors
/// Returns `SyncError::FileSystem` if the walk fails, `SyncError::Storage`
/// for upload, listing, delete, or configuration failures.
pub async fn sync_directory<C: StorageClient + ?Sized>(
    client: &C,
    root: &Path,
    options: &SyncOptions,
) -> Result<SyncSummary, SyncError> {
    let prefix: String = normalize_prefix(&options.prefix);
    let concurrency: usize = options.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
    let default_mapping: CacheControlMap = CacheControlMap::default_table();
    let mapping: &CacheControlMap = options.cache_control.as_ref().unwrap_or(&default_mapping);

    let files: Vec<WalkedFile> = walk(root)?;
    log::info!(
        "Syncing {} files from {} to s3://{}/{prefix}",
        files.len(),
        root.display(),
        options.bucket
    );

    let mut queue: WorkQueue<String> = WorkQueue::new(concurrency)?;
    for file in files {
        let job: UploadJob = UploadJob {
            key: format!("{prefix}{}", file.relative_path),
            relative_path: file.relative_path,
            path: file.path,
        };
        let bucket: &str = &options.bucket;
        queue
            .push(async move { upload_file(client, bucket, &job, mapping).await })
            .await?;
    }

    let uploaded_keys: Vec<String> = queue.drain().await?;
    let uploaded: u64 = uploaded_keys.len() as u64;
    log::info!("Uploaded {uploaded} files");

    let mut deleted: u64 = 0;
    if options.delete {
        let keep: HashSet<String> = uploaded_keys.into_iter().collect();
        deleted = reconcile(client, &options.bucket, &prefix, &keep, concurrency).await?;
        log::info!("Deleted {deleted} old files");
    }

    Ok(SyncSummary { uploaded, deleted })
}
