use thiserror::Error;

use crate::security::EncryptionError;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory unavailable")]
    DataLocalDirUnavailable,
}

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("blob i/o failed: {0}")]
    Io(String),

    #[error("blob encryption failed: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("invalid blob id: {0}")]
    InvalidId(String),
}

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("state store i/o failed: {0}")]
    Io(String),

    #[error("state serialization failed: {0}")]
    Serialization(String),
}
