//! Shared data structures for sync operations.

use std::path::PathBuf;

use crate::cache_control::CacheControlMap;

/// A single file queued for upload.
///
/// Created by the orchestrator from walker output, consumed exactly once by
/// the upload executor.
#[derive(Debug, Clone)]
pub struct UploadJob {
    /// Absolute path of the local file.
    pub path: PathBuf,
    /// Root-relative POSIX path, used for cache-control resolution.
    pub relative_path: String,
    /// Full object key (normalized prefix + relative path).
    pub key: String,
}

/// Run configuration for a sync pass.
///
/// Constructed once, read-only for the duration of the run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Target bucket name.
    pub bucket: String,
    /// Key prefix scoping uploads and deletions. Normalized by the
    /// orchestrator: empty stays empty, non-empty gets exactly one trailing
    /// separator.
    pub prefix: String,
    /// Delete bucket objects under the prefix that are missing locally.
    pub delete: bool,
    /// Maximum concurrent storage operations. `None` defaults to
    /// [`site_sync_common::DEFAULT_CONCURRENCY`]; a configured value below 1
    /// is rejected.
    pub concurrency: Option<usize>,
    /// Cache-control rules. `None` uses the default single-page-app table.
    pub cache_control: Option<CacheControlMap>,
}

/// Counts reported at the end of a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Objects successfully uploaded.
    pub uploaded: u64,
    /// Objects deleted during reconciliation (0 when delete was off).
    pub deleted: u64,
}
