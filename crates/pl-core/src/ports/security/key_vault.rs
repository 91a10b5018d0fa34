use crate::security::{EncryptionError, EncryptionKey};

/// Owner of the one installation-wide encryption key.
pub trait KeyVaultPort: Send + Sync {
    /// Resolve the key: process cache, current store entry, legacy store entry
    /// (migrated on sight), or a freshly generated and stored key.
    ///
    /// Error semantics:
    /// - KeyUnavailable: the store refused both read and write
    fn get_or_create_key(&self) -> Result<EncryptionKey, EncryptionError>;

    /// Whether a key exists in the store, without generating one.
    ///
    /// `Err(KeyUnavailable)` when the store could not be read: the key may
    /// exist, and callers must not treat it as absent.
    fn has_stored_key(&self) -> Result<bool, EncryptionError>;

    /// Replace the key with a fresh one.
    ///
    /// The current key is resolved first and written back if storing the new
    /// one fails. Already-persisted ciphertext is NOT re-encrypted; callers
    /// must re-seal dependent state right after a successful rotation.
    fn rotate(&self) -> Result<(), EncryptionError>;
}
