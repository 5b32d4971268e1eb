//! Configuration for the S3 storage client.

/// AWS credentials.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

/// Settings for constructing an [`crate::S3StorageClient`].
///
/// Everything is optional; unset fields fall back to the SDK's default
/// provider chain (environment, shared config, instance metadata).
#[derive(Debug, Clone, Default)]
pub struct S3StorageSettings {
    /// Region override. `None` resolves from the environment.
    pub region: Option<String>,
    /// Named profile from the shared AWS config.
    pub profile: Option<String>,
    /// Explicit credentials instead of the default provider chain.
    pub credentials: Option<AwsCredentials>,
    /// Custom endpoint URL (S3-compatible stores such as R2 or MinIO).
    pub endpoint_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_use_provider_chain() {
        let settings: S3StorageSettings = S3StorageSettings::default();
        assert!(settings.region.is_none());
        assert!(settings.profile.is_none());
        assert!(settings.credentials.is_none());
        assert!(settings.endpoint_url.is_none());
    }
}
