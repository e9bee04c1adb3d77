use async_trait::async_trait;
use http::{HeaderMap, HeaderValue, header};
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::traits::ObjectStore;
use crate::config::StorageConfig;

/// [`ObjectStore`] backed by S3 or an S3-compatible service.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    prefix: String,
    expiry_secs: u32,
}

impl S3ObjectStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        if config.bucket.is_empty() {
            return Err(StorageError::Config("storage.bucket is not set".into()));
        }

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse().map_err(|e| {
                StorageError::Config(format!("invalid region '{}': {e:?}", config.region))
            })?,
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(access), Some(secret), None, None, None)
            }
            _ => Credentials::default(),
        }
        .map_err(|e| StorageError::Config(e.to_string()))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            prefix: config.prefix.trim_matches('/').to_string(),
            expiry_secs: config.signed_url_expiration,
        })
    }

    fn object_path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix, key)
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }

        self.bucket
            .presign_put(self.object_path(key), self.expiry_secs, Some(headers), None)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))
    }

    async fn presign_download(&self, key: &str) -> Result<String, StorageError> {
        self.bucket
            .presign_get(self.object_path(key), self.expiry_secs, None)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        // The S3 API deletes one object per request here; missing keys
        // come back as successful no-ops.
        for key in keys {
            self.bucket
                .delete_object(self.object_path(key))
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            tracing::debug!("deleted object {key}");
        }
        Ok(())
    }
}
