//! Key and record types for history encryption.
//!
//! This module describes the key and the on-disk record layout only. It does
//! NOT implement crypto algorithms or talk to the credential store.

mod address;
mod key;

pub use address::SecretAddress;
pub use key::{EncryptionError, EncryptionKey, KEY_LEN};

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest possible record: empty ciphertext, tag and nonce.
///
/// Record layout: `ciphertext || tag || nonce`.
pub const MIN_RECORD_LEN: usize = TAG_LEN + NONCE_LEN;
