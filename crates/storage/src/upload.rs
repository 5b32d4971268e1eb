//! Per-file upload execution.

use crate::cache_control::CacheControlMap;
use crate::error::StorageError;
use crate::redirect::redirect_region;
use crate::traits::StorageClient;
use crate::types::UploadJob;

/// Upload one file and return the key written.
///
/// Reads the file fully into memory, derives the content type from the
/// extension (omitted when unknown), resolves cache-control against the
/// mapping (omitted when no rule matches), and issues a single put.
///
/// If the put fails with a permanent-redirect condition the client is
/// rebound to the region named by the redirect endpoint and the same put is
/// retried exactly once. The rebound client persists for the rest of the
/// run. Any other failure (including a second redirect) propagates.
///
/// # Arguments
/// * `client` - Storage client
/// * `bucket` - Target bucket
/// * `job` - File path and precomputed key
/// * `mapping` - Cache-control rules
///
/// # Returns
/// The full object key written.
///
/// # Errors
/// Returns `StorageError::IoError` if the file cannot be read,
/// `StorageError::Upload` if the put fails.
pub async fn upload_file<C: StorageClient + ?Sized>(
    client: &C,
    bucket: &str,
    job: &UploadJob,
    mapping: &CacheControlMap,
) -> Result<String, StorageError> {
    let data: Vec<u8> =
        tokio::fs::read(&job.path)
            .await
            .map_err(|e| StorageError::IoError {
                path: job.path.display().to_string(),
                message: e.to_string(),
            })?;

    let content_type: Option<&str> = mime_guess::from_path(&job.path).first_raw();
    let cache_control: Option<&str> = mapping.resolve(&job.relative_path);

    let result = client
        .put_object(bucket, &job.key, &data, content_type, cache_control)
        .await;

    match result {
        Ok(()) => {}
        Err(StorageError::Redirect { endpoint }) => {
            let region: String = redirect_region(endpoint.as_deref());
            log::warn!(
                "Bucket {bucket} is served from {region}, rebinding client and retrying {}",
                job.key
            );
            client.rebind_region(&region).await?;
            client
                .put_object(bucket, &job.key, &data, content_type, cache_control)
                .await
                .map_err(|e| match e {
                    // One transparent retry only
                    StorageError::Redirect { endpoint } => StorageError::Upload {
                        bucket: bucket.to_string(),
                        key: job.key.clone(),
                        message: format!(
                            "still redirected after rebinding to {region} (endpoint {})",
                            endpoint.as_deref().unwrap_or("<legacy>")
                        ),
                    },
                    other => other,
                })?;
        }
        Err(e) => return Err(e),
    }

    log::info!("Uploaded {} -> s3://{bucket}/{}", job.path.display(), job.key);
    Ok(job.key.clone())
}
