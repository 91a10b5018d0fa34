use std::sync::Arc;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use tracing::debug;

use pl_core::ports::{KeyVaultPort, RecordCipherPort};
use pl_core::security::{EncryptionError, EncryptionKey, MIN_RECORD_LEN, NONCE_LEN};

/// Seal `plaintext` into `ciphertext || tag || nonce`.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| EncryptionError::CryptoFailure)?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let mut record = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| EncryptionError::CryptoFailure)?;
    record.extend_from_slice(&nonce);
    Ok(record)
}

/// Open a record produced by [`seal`].
///
/// Short input, a wrong key and tampering all fail the same way.
pub fn open(key: &EncryptionKey, record: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    if record.len() < MIN_RECORD_LEN {
        return Err(EncryptionError::AuthenticationFailed);
    }
    let (sealed, nonce) = record.split_at(record.len() - NONCE_LEN);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| EncryptionError::CryptoFailure)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| EncryptionError::AuthenticationFailed)
}

/// AES-256-GCM over the vault's current key.
pub struct AesGcmCipher {
    vault: Arc<dyn KeyVaultPort>,
}

impl AesGcmCipher {
    pub fn new(vault: Arc<dyn KeyVaultPort>) -> Self {
        Self { vault }
    }
}

impl RecordCipherPort for AesGcmCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        let key = self.vault.get_or_create_key().map_err(|e| match e {
            EncryptionError::KeyUnavailable(_) => e,
            other => EncryptionError::KeyUnavailable(other.to_string()),
        })?;
        seal(&key, plaintext)
    }

    fn decrypt(&self, record: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        let key = self.vault.get_or_create_key().map_err(|e| {
            debug!(error = %e, "no key for decryption");
            EncryptionError::AuthenticationFailed
        })?;
        open(&key, record)
    }
}
