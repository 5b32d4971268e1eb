//! Storage traits/interfaces for bucket operations.

use async_trait::async_trait;

use crate::error::StorageError;

/// One page of a paginated object listing.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Keys of the objects in this page.
    pub keys: Vec<String>,
    /// Continuation token for the next page, if the listing is truncated.
    pub next_token: Option<String>,
}

/// Low-level bucket operations - implemented by each backend.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload bytes as an object.
    ///
    /// `content_type` and `cache_control` are omitted from the request when
    /// `None`. A put rejected with a permanent-redirect condition must be
    /// reported as [`StorageError::Redirect`] so the upload executor can
    /// rebind and retry.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: Option<&str>,
        cache_control: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Delete a single object.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    /// Fetch one page of the object listing under a prefix.
    ///
    /// Page size is provider-determined. Pass the `next_token` from the
    /// previous page to continue; `None` starts from the beginning.
    async fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ObjectPage, StorageError>;

    /// Rebind the client to a different region.
    ///
    /// Used for permanent-redirect recovery. The rebound client must serve
    /// all subsequent calls; rebinding to the current region is a no-op, and
    /// concurrent rebinds to the same region must be idempotent.
    async fn rebind_region(&self, region: &str) -> Result<(), StorageError>;
}
