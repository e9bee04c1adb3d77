use serde::Deserialize;

/// Object storage configuration shared by every binary that talks to the
/// media bucket.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Bucket holding uploaded media.
    pub bucket: String,
    /// AWS region name, e.g. "eu-central-1". Default: "us-east-1".
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO etc.). When set, the
    /// client switches to path-style addressing.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Key prefix under which all media objects live. Default: "blog-images".
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Lifetime of presigned URLs in seconds. Default: 300.
    #[serde(default = "default_signed_url_expiration")]
    pub signed_url_expiration: u32,
    /// Static credentials. When absent, the default provider chain
    /// (environment, profile) is used.
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
}

fn default_region() -> String {
    "us-east-1".into()
}
fn default_prefix() -> String {
    "blog-images".into()
}
fn default_signed_url_expiration() -> u32 {
    300
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
            prefix: default_prefix(),
            signed_url_expiration: default_signed_url_expiration(),
            access_key: None,
            secret_key: None,
        }
    }
}
