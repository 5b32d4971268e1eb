//! site-sync command-line interface.
//!
//! Uploads a built site directory to an object-storage bucket, assigning
//! content-type and cache-control headers per file, and optionally deletes
//! bucket objects under the prefix that are no longer present locally.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use site_sync_storage::{sync_directory, CacheControlMap, SyncOptions, SyncSummary};
use site_sync_storage_s3::{S3StorageClient, S3StorageSettings};

/// Sync a local directory to an object-storage bucket.
#[derive(Debug, Parser)]
#[command(name = "site-sync", version)]
struct Args {
    /// Local directory to upload.
    root: PathBuf,

    /// Target bucket name.
    #[arg(long)]
    bucket: String,

    /// Key prefix inside the bucket.
    #[arg(long, default_value = "")]
    prefix: String,

    /// Delete bucket objects under the prefix that are missing locally.
    #[arg(long)]
    delete: bool,

    /// Maximum number of concurrent storage operations (default 100).
    #[arg(long)]
    concurrency: Option<usize>,

    /// JSON file with ordered cache-control rules, an array of
    /// single-entry objects: [{"index.html": "max-age=60"}, ...].
    #[arg(long)]
    cache_control_file: Option<PathBuf>,

    /// AWS region override.
    #[arg(long)]
    region: Option<String>,

    /// Named profile from the shared AWS config.
    #[arg(long)]
    profile: Option<String>,

    /// Custom S3 endpoint URL (R2, MinIO, ...).
    #[arg(long)]
    endpoint_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = Args::parse();

    if args.concurrency == Some(0) {
        bail!("--concurrency must be at least 1");
    }

    let cache_control: Option<CacheControlMap> = match &args.cache_control_file {
        Some(path) => {
            let text: String = std::fs::read_to_string(path)
                .with_context(|| format!("reading cache-control file {}", path.display()))?;
            Some(
                CacheControlMap::from_json_str(&text)
                    .with_context(|| format!("parsing cache-control file {}", path.display()))?,
            )
        }
        None => None,
    };

    let client: S3StorageClient = S3StorageClient::new(S3StorageSettings {
        region: args.region.clone(),
        profile: args.profile.clone(),
        credentials: None,
        endpoint_url: args.endpoint_url.clone(),
    })
    .await
    .context("initializing storage client")?;

    let options: SyncOptions = SyncOptions {
        bucket: args.bucket.clone(),
        prefix: args.prefix.clone(),
        delete: args.delete,
        concurrency: args.concurrency,
        cache_control,
    };

    let summary: SyncSummary = sync_directory(&client, &args.root, &options)
        .await
        .with_context(|| format!("syncing {} to s3://{}", args.root.display(), args.bucket))?;

    println!("Uploaded {} files", summary.uploaded);
    if args.delete {
        println!("Deleted {} old files", summary.deleted);
    }

    Ok(())
}
