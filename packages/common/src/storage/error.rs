use thiserror::Error;

/// Errors that can occur while talking to the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store was misconfigured (bad region, missing credentials, ...).
    #[error("storage configuration error: {0}")]
    Config(String),
    /// The backend rejected or failed a request.
    #[error("storage backend error: {0}")]
    Backend(String),
}
