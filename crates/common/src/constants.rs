//! Shared constants used across site-sync crates.

/// Default number of concurrent in-flight storage operations.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Region implied by a legacy redirect endpoint that names no region.
pub const FALLBACK_REGION: &str = "us-east-1";
