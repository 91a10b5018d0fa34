use thiserror::Error;

use crate::security::SecretAddress;

/// Secure storage errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecureStorageError {
    /// Secure storage is unavailable on this platform.
    #[error("secure storage unavailable: {0}")]
    Unavailable(String),

    /// Access was denied by the platform (permissions/ACL).
    #[error("secure storage access denied: {0}")]
    PermissionDenied(String),

    /// An entry already exists at the address; delete it first.
    #[error("secure storage entry already exists: {0}")]
    AlreadyExists(String),

    /// Stored data is corrupt or invalid.
    #[error("secure storage data corrupt: {0}")]
    Corrupt(String),

    /// Other storage failures.
    #[error("secure storage failed: {0}")]
    Other(String),
}

/// Platform credential store addressed by (service, account).
///
/// There is no update-in-place: replacing a secret is `delete` then `add`.
pub trait SecureStoragePort: Send + Sync {
    /// Add a secret. Fails with `AlreadyExists` if the address is taken.
    fn add(&self, address: &SecretAddress, secret: &[u8]) -> Result<(), SecureStorageError>;

    /// Get the secret at an address.
    fn get(&self, address: &SecretAddress) -> Result<Option<Vec<u8>>, SecureStorageError>;

    /// Delete the secret at an address. Absence is not an error.
    fn delete(&self, address: &SecretAddress) -> Result<(), SecureStorageError>;
}
