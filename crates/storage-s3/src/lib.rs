//! AWS SDK S3 backend for site-sync storage.
//!
//! This crate provides a `StorageClient` implementation using the AWS SDK
//! for Rust. The client handle lives in a single rebindable slot so that
//! permanent-redirect recovery can re-target the bucket's actual region
//! once and have every subsequent operation use the corrected client.
//!
//! # Example
//!
//! ```ignore
//! use site_sync_storage_s3::{S3StorageClient, S3StorageSettings};
//!
//! let settings = S3StorageSettings {
//!     region: Some("eu-west-1".to_string()),
//!     ..S3StorageSettings::default()
//! };
//! let client = S3StorageClient::new(settings).await?;
//! ```

mod client;
mod settings;

pub use client::S3StorageClient;
pub use settings::{AwsCredentials, S3StorageSettings};
