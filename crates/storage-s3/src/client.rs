//! AWS SDK S3 client implementation.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tokio::sync::RwLock;

use site_sync_common::FALLBACK_REGION;
use site_sync_storage::{ObjectPage, StorageClient, StorageError};

use crate::settings::S3StorageSettings;

/// The region-bound client handle.
///
/// A permanent redirect swaps the whole slot, so the corrected client
/// serves every subsequent operation in the run.
struct ClientSlot {
    /// The underlying S3 client.
    client: S3Client,
    /// Region the client is currently bound to.
    region: String,
}

/// `StorageClient` implementation using the AWS SDK for Rust.
pub struct S3StorageClient {
    slot: RwLock<ClientSlot>,
}

impl S3StorageClient {
    /// Create a new S3 storage client.
    ///
    /// Unset settings resolve through the SDK's default provider chain.
    ///
    /// # Arguments
    /// * `settings` - Optional region/profile/credentials/endpoint overrides
    pub async fn new(settings: S3StorageSettings) -> Result<Self, StorageError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(ref profile) = settings.profile {
            loader = loader.profile_name(profile.as_str());
        }
        if let Some(ref region) = settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(ref endpoint) = settings.endpoint_url {
            loader = loader.endpoint_url(endpoint.as_str());
        }
        if let Some(ref creds) = settings.credentials {
            let credentials = Credentials::new(
                creds.access_key_id.as_str(),
                creds.secret_access_key.as_str(),
                creds.session_token.clone(),
                None,
                "site-sync",
            );
            loader = loader.credentials_provider(credentials);
        }

        let sdk_config = loader.load().await;
        let region: String = sdk_config
            .region()
            .map(ToString::to_string)
            .unwrap_or_else(|| FALLBACK_REGION.to_string());
        let client: S3Client = S3Client::new(&sdk_config);

        Ok(Self {
            slot: RwLock::new(ClientSlot { client, region }),
        })
    }

    /// Create a client from an existing S3 client (for testing).
    ///
    /// # Arguments
    /// * `client` - Pre-configured S3 client
    /// * `region` - Region the client is bound to
    pub fn from_client(client: S3Client, region: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(ClientSlot {
                client,
                region: region.into(),
            }),
        }
    }

    /// Clone the current client handle out of the slot.
    async fn client(&self) -> S3Client {
        self.slot.read().await.client.clone()
    }
}

#[async_trait]
impl StorageClient for S3StorageClient {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: Option<&str>,
        cache_control: Option<&str>,
    ) -> Result<(), StorageError> {
        let mut request = self
            .client()
            .await
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }
        if let Some(cc) = cache_control {
            request = request.cache_control(cc);
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(err) => Err(classify_put_error(bucket, key, &err)),
        }
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.client()
            .await
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| StorageError::Delete {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: error_message(&err),
            })?;

        Ok(())
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ObjectPage, StorageError> {
        let mut request = self.client().await.list_objects_v2().bucket(bucket);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let output = request.send().await.map_err(|err| StorageError::List {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            message: error_message(&err),
        })?;

        let keys: Vec<String> = output
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(str::to_string))
            .collect();

        let next_token: Option<String> = if output.is_truncated() == Some(true) {
            output.next_continuation_token().map(String::from)
        } else {
            None
        };

        Ok(ObjectPage { keys, next_token })
    }

    async fn rebind_region(&self, region: &str) -> Result<(), StorageError> {
        let mut slot = self.slot.write().await;
        if slot.region == region {
            // Another upload already followed the same redirect
            return Ok(());
        }

        let config = slot
            .client
            .config()
            .to_builder()
            .region(Region::new(region.to_string()))
            .build();
        slot.client = S3Client::from_conf(config);
        slot.region = region.to_string();
        log::info!("Storage client rebound to region {region}");

        Ok(())
    }
}

/// Classify a put failure, separating the recoverable redirect case.
fn classify_put_error(
    bucket: &str,
    key: &str,
    err: &SdkError<PutObjectError>,
) -> StorageError {
    if let Some(service_err) = err.as_service_error() {
        if service_err.meta().code() == Some("PermanentRedirect") {
            // The redirect body names the correct endpoint; some responses
            // only carry the region header instead.
            let endpoint: Option<String> = service_err
                .meta()
                .extra("Endpoint")
                .map(str::to_string)
                .or_else(|| {
                    err.raw_response()
                        .and_then(|response| response.headers().get("x-amz-bucket-region"))
                        .map(|region| format!("s3.{region}.amazonaws.com"))
                });
            return StorageError::Redirect { endpoint };
        }
    }

    StorageError::Upload {
        bucket: bucket.to_string(),
        key: key.to_string(),
        message: error_message(err),
    }
}

/// Human-readable message for an SDK error, preferring the service detail.
fn error_message<E>(err: &SdkError<E>) -> String
where
    E: ProvideErrorMetadata + std::fmt::Display,
{
    match err.as_service_error() {
        Some(service_err) => service_err
            .meta()
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| service_err.to_string()),
        None => err.to_string(),
    }
}
