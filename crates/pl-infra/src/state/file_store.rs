use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use pl_core::ports::{StateStoreError, StateStorePort};

/// Key/value state, one file per key under a single directory.
///
/// Writes go to `<key>.tmp` and are renamed over the target, so a reader sees
/// either the previous value or the new one.
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StateStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StateStoreError::Io(format!("invalid state key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }

    async fn ensure_dir(&self) -> Result<(), StateStoreError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            StateStoreError::Io(format!("create state dir failed: {}: {}", self.dir.display(), e))
        })
    }
}

#[async_trait]
impl StateStorePort for FileStateStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateStoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateStoreError::Io(format!(
                "read state failed: {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StateStoreError> {
        let path = self.path_for(key)?;
        self.ensure_dir().await?;

        let tmp_path = self.dir.join(format!("{}.tmp", key));
        fs::write(&tmp_path, value).await.map_err(|e| {
            StateStoreError::Io(format!("write temp state failed: {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &path).await.map_err(|e| {
            StateStoreError::Io(format!(
                "rename temp state failed: {} -> {}: {}",
                tmp_path.display(),
                path.display(),
                e
            ))
        })?;

        debug!(key, size = value.len(), "state written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateStoreError::Io(format!(
                "remove state failed: {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
