//! Deletion of bucket objects that are no longer present locally.

use std::collections::HashSet;

use crate::error::StorageError;
use crate::queue::WorkQueue;
use crate::traits::{ObjectPage, StorageClient};

/// Delete every object under `prefix` whose key is not in `keep`.
///
/// Lists the bucket page by page; deletions for a page are submitted to a
/// bounded work queue and fully drained before the next page is requested,
/// so the number of in-flight deletes and the retained listing both stay
/// bounded for arbitrarily large buckets.
///
/// The central invariant of sync semantics: a key present in `keep` is
/// never deleted, regardless of listing order or pagination boundaries.
/// Keys outside the prefix are ignored even if the backend returns them.
///
/// # Arguments
/// * `client` - Storage client
/// * `bucket` - Target bucket
/// * `prefix` - Normalized key prefix scoping the reconciliation
/// * `keep` - Keys uploaded during this run
/// * `concurrency` - Bound on in-flight deletes, at least 1
///
/// # Returns
/// Total number of objects deleted.
///
/// # Errors
/// Returns `StorageError::List` if listing fails, `StorageError::Delete`
/// if a delete fails (fail-fast; deletes still in flight are dropped and
/// no further page is requested).
pub async fn reconcile<C: StorageClient + ?Sized>(
    client: &C,
    bucket: &str,
    prefix: &str,
    keep: &HashSet<String>,
    concurrency: usize,
) -> Result<u64, StorageError> {
    let mut deleted: u64 = 0;
    let mut token: Option<String> = None;

    loop {
        let page: ObjectPage = client
            .list_objects_page(bucket, prefix, token.as_deref())
            .await?;

        let mut queue: WorkQueue<String> = WorkQueue::new(concurrency)?;
        for key in page.keys {
            if !key.starts_with(prefix) || keep.contains(&key) {
                continue;
            }

            queue
                .push(async move {
                    client.delete_object(bucket, &key).await?;
                    log::info!("Deleted s3://{bucket}/{key}");
                    Ok(key)
                })
                .await?;
        }

        deleted += queue.drain().await?.len() as u64;

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(deleted)
}
