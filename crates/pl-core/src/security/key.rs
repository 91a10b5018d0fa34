use std::fmt;

use rand::{rngs::OsRng, TryRngCore};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncryptionError {
    /// The credential store could neither provide nor persist a key.
    #[error("encryption key unavailable: {0}")]
    KeyUnavailable(String),

    /// Decryption was rejected: wrong key, tampered data or not ciphertext at all.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("crypto operation failed")]
    CryptoFailure,
}

/// The 256-bit symmetric key protecting history and image blobs.
///
/// - Do NOT implement Serialize/Deserialize.
/// - Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey([REDACTED])")
    }
}

impl EncryptionKey {
    pub fn generate() -> Result<Self, EncryptionError> {
        let mut buf = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|_| EncryptionError::CryptoFailure)?;
        let key = Self(buf);
        buf.zeroize();
        Ok(key)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncryptionError> {
        if bytes.len() != KEY_LEN {
            return Err(EncryptionError::InvalidKeyMaterial(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            )));
        }
        let mut buf = [0u8; KEY_LEN];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
