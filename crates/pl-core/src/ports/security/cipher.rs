use crate::security::EncryptionError;

/// Authenticated encryption of opaque buffers with the installation key.
pub trait RecordCipherPort: Send + Sync {
    /// Seal `plaintext` into a combined record with a fresh nonce.
    ///
    /// Failure mapping:
    /// - no key obtainable -> EncryptionError::KeyUnavailable
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError>;

    /// Open a combined record.
    ///
    /// Failure mapping:
    /// - wrong key, tampered, truncated or not a record at all
    ///   -> EncryptionError::AuthenticationFailed, one kind for all of them so
    ///   the legacy-plaintext fallback can treat it as a cheap miss
    fn decrypt(&self, record: &[u8]) -> Result<Vec<u8>, EncryptionError>;
}
