use async_trait::async_trait;

use super::error::StorageError;

/// Boundary to the object store holding uploaded media.
///
/// The application never transfers object bytes itself; clients upload
/// directly against presigned URLs and the backend only hands out keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Presigned, time-limited PUT URL for uploading `key` with the given
    /// content type.
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Presigned, time-limited GET URL for reading `key`.
    async fn presign_download(&self, key: &str) -> Result<String, StorageError>;

    /// Remove a batch of keys. Keys that do not exist are ignored.
    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError>;
}
