use crate::CoreError;
use async_trait::async_trait;

/// Persists an uploaded deck image and returns the public path it is served under.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, CoreError>;

    /// Drops an image previously returned by [`ImageStore::store`]. Unknown paths are ignored.
    async fn remove(&self, url: &str) -> Result<(), CoreError>;
}
