use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use pl_core::ids::BlobId;
use pl_core::ports::{BlobStoreError, ImageBlobStorePort, RecordCipherPort};

pub const IMAGE_FILE_EXTENSION: &str = "enc";

/// Image blobs on disk, one sealed record per file: `<dir>/<BlobId>.enc`.
///
/// The directory is created on first save.
pub struct EncryptedImageStore {
    dir: PathBuf,
    cipher: Arc<dyn RecordCipherPort>,
}

impl EncryptedImageStore {
    pub fn new(dir: PathBuf, cipher: Arc<dyn RecordCipherPort>) -> Self {
        Self { dir, cipher }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &BlobId) -> Result<PathBuf, BlobStoreError> {
        if !id.is_valid() {
            return Err(BlobStoreError::InvalidId(id.to_string()));
        }
        Ok(self
            .dir
            .join(format!("{}.{}", id.as_str(), IMAGE_FILE_EXTENSION)))
    }
}

#[async_trait]
impl ImageBlobStorePort for EncryptedImageStore {
    async fn save(&self, image: &[u8]) -> Result<BlobId, BlobStoreError> {
        let id = BlobId::new();
        let path = self.path_for(&id)?;

        let sealed = self.cipher.encrypt(image)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BlobStoreError::Io(format!("create {}: {}", self.dir.display(), e)))?;
        fs::write(&path, sealed)
            .await
            .map_err(|e| BlobStoreError::Io(format!("write {}: {}", path.display(), e)))?;

        debug!(blob_id = %id, plain_size = image.len(), "image blob saved");
        Ok(id)
    }

    async fn load(&self, id: &BlobId) -> Option<Vec<u8>> {
        let path = match self.path_for(id) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "refusing to load blob");
                return None;
            }
        };

        let sealed = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(blob_id = %id, error = %e, "image blob unreadable");
                return None;
            }
        };

        match self.cipher.decrypt(&sealed) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(blob_id = %id, error = %e, "image blob failed to decrypt");
                None
            }
        }
    }

    async fn replace(&self, id: &BlobId, image: &[u8]) -> Result<(), BlobStoreError> {
        let path = self.path_for(id)?;
        let sealed = self.cipher.encrypt(image)?;

        let tmp_path = path.with_extension(format!("{}.tmp", IMAGE_FILE_EXTENSION));
        fs::write(&tmp_path, sealed)
            .await
            .map_err(|e| BlobStoreError::Io(format!("write {}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| BlobStoreError::Io(format!("rename {}: {}", path.display(), e)))?;

        debug!(blob_id = %id, "image blob re-sealed");
        Ok(())
    }

    async fn delete(&self, id: &BlobId) {
        let path = match self.path_for(id) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "refusing to delete blob");
                return;
            }
        };
        match fs::remove_file(&path).await {
            Ok(()) => debug!(blob_id = %id, "image blob deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(blob_id = %id, error = %e, "failed to delete image blob"),
        }
    }

    async fn delete_all(&self) -> Result<(), BlobStoreError> {
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => debug!(dir = %self.dir.display(), "image directory removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(BlobStoreError::Io(format!(
                    "remove {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        }
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BlobStoreError::Io(format!("create {}: {}", self.dir.display(), e)))
    }
}
