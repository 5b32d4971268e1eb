//! Region extraction for permanent-redirect recovery.

use regex::Regex;
use site_sync_common::FALLBACK_REGION;

/// Extract the target region from a redirect endpoint host.
///
/// Endpoint hosts look like `bucket.s3-eu-west-1.amazonaws.com`,
/// `bucket.s3.eu-west-1.amazonaws.com`, or the dualstack form
/// `bucket.s3.dualstack.eu-west-1.amazonaws.com`. An endpoint without a
/// capturable region (or no endpoint at all) is the legacy global
/// endpoint, which implies `us-east-1`.
///
/// # Arguments
/// * `endpoint` - Endpoint host named by the redirect, if any
///
/// # Returns
/// The region to rebind the storage client to.
pub fn redirect_region(endpoint: Option<&str>) -> String {
    let Some(endpoint) = endpoint else {
        return FALLBACK_REGION.to_string();
    };

    let pattern: Regex =
        Regex::new(r"(?:^|\.)s3[-.](?:dualstack\.)?([a-z0-9-]+)\.amazonaws\.com$")
            .expect("valid regex");

    match pattern.captures(endpoint) {
        Some(captures) => captures[1].to_string(),
        None => FALLBACK_REGION.to_string(),
    }
}
