use async_trait::async_trait;

use crate::ids::BlobId;
use crate::ports::errors::BlobStoreError;

/// Encrypted storage of captured images, one blob per id.
///
/// Ids are generated by the store and never reused, so concurrent readers
/// and writers never race on the same blob.
#[async_trait]
pub trait ImageBlobStorePort: Send + Sync {
    /// Encrypt and persist `image` under a fresh id.
    async fn save(&self, image: &[u8]) -> Result<BlobId, BlobStoreError>;

    /// Read and decrypt a blob. Any failure yields `None`.
    async fn load(&self, id: &BlobId) -> Option<Vec<u8>>;

    /// Re-seal an existing blob with `image` under the current key.
    async fn replace(&self, id: &BlobId, image: &[u8]) -> Result<(), BlobStoreError>;

    /// Best-effort removal. A missing blob is not an error.
    async fn delete(&self, id: &BlobId);

    /// Remove every blob, leaving an empty store.
    async fn delete_all(&self) -> Result<(), BlobStoreError>;
}
