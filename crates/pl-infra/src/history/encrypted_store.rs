use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use pl_core::history::{HistoryEntry, HistorySource, LoadedHistory};
use pl_core::ports::{HistoryStorePort, KeyVaultPort, RecordCipherPort, StateStorePort};
use pl_core::security::EncryptionError;

/// State key holding the sealed history record.
pub const HISTORY_STATE_KEY: &str = "ClipboardHistory";

/// The whole history list as one sealed record in the state namespace.
///
/// Records written before encryption existed are plain JSON with the same
/// schema; they are read through a fallback and re-sealed on the next save.
pub struct EncryptedHistoryStore {
    state: Arc<dyn StateStorePort>,
    cipher: Arc<dyn RecordCipherPort>,
    vault: Arc<dyn KeyVaultPort>,
}

impl EncryptedHistoryStore {
    pub fn new(
        state: Arc<dyn StateStorePort>,
        cipher: Arc<dyn RecordCipherPort>,
        vault: Arc<dyn KeyVaultPort>,
    ) -> Self {
        Self {
            state,
            cipher,
            vault,
        }
    }

    fn interpret(&self, bytes: &[u8], key_existed: bool) -> LoadedHistory {
        if let Ok(plain) = self.cipher.decrypt(bytes) {
            match serde_json::from_slice::<Vec<HistoryEntry>>(&plain) {
                Ok(entries) => {
                    return LoadedHistory {
                        entries: well_formed(entries),
                        source: HistorySource::Encrypted,
                    }
                }
                Err(e) => warn!(error = %e, "decrypted history does not match schema"),
            }
        }

        if let Some(legacy) = legacy_plaintext(bytes) {
            return legacy;
        }

        if !key_existed {
            error!(
                size = bytes.len(),
                "persisted history exists but no key was ever stored; history is unrecoverable"
            );
            return LoadedHistory::empty(HistorySource::Unrecoverable);
        }

        warn!(size = bytes.len(), "persisted history is unreadable; discarding");
        LoadedHistory::empty(HistorySource::Discarded)
    }
}

/// Records written before encryption existed: plain JSON, same schema.
fn legacy_plaintext(bytes: &[u8]) -> Option<LoadedHistory> {
    let entries = serde_json::from_slice::<Vec<HistoryEntry>>(bytes).ok()?;
    info!(count = entries.len(), "read legacy plaintext history");
    Some(LoadedHistory {
        entries: well_formed(entries),
        source: HistorySource::LegacyPlaintext,
    })
}

/// The key store could not be read. Plaintext records need no key; anything
/// else stays on disk untouched.
fn unavailable_key(bytes: &[u8], error: &EncryptionError) -> LoadedHistory {
    if let Some(legacy) = legacy_plaintext(bytes) {
        return legacy;
    }
    warn!(error = %error, "encryption key unavailable; persisted history left untouched");
    LoadedHistory::empty(HistorySource::Unavailable)
}

fn well_formed(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let total = entries.len();
    let kept: Vec<HistoryEntry> = entries
        .into_iter()
        .filter(HistoryEntry::is_well_formed)
        .collect();
    if kept.len() != total {
        warn!(dropped = total - kept.len(), "dropped malformed history entries");
    }
    kept
}

#[async_trait]
impl HistoryStorePort for EncryptedHistoryStore {
    async fn load(&self) -> LoadedHistory {
        let bytes = match self.state.get(HISTORY_STATE_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return LoadedHistory::empty(HistorySource::Empty),
            Err(e) => {
                warn!(error = %e, "failed to read persisted history; leaving it untouched");
                return LoadedHistory::empty(HistorySource::Unavailable);
            }
        };

        // Must be sampled before decrypting: decryption resolves the key and
        // creates one when none is stored.
        let key_existed = match self.vault.has_stored_key() {
            Ok(existed) => existed,
            Err(e) => return unavailable_key(&bytes, &e),
        };
        if key_existed {
            // Resolving an existing key never generates; a failure here means
            // the store became unreadable, not that the record is foreign.
            if let Err(e) = self.vault.get_or_create_key() {
                return unavailable_key(&bytes, &e);
            }
        }

        let loaded = self.interpret(&bytes, key_existed);
        debug!(source = ?loaded.source, count = loaded.entries.len(), "history loaded");
        loaded
    }

    async fn save(&self, entries: &[HistoryEntry]) -> bool {
        let plain = match serde_json::to_vec(entries) {
            Ok(plain) => plain,
            Err(e) => {
                error!(error = %e, "failed to serialize history");
                return false;
            }
        };

        let sealed = match self.cipher.encrypt(&plain) {
            Ok(sealed) => sealed,
            Err(e) => {
                warn!(error = %e, "failed to encrypt history; will retry on next save");
                return false;
            }
        };

        match self.state.set(HISTORY_STATE_KEY, &sealed).await {
            Ok(()) => {
                debug!(count = entries.len(), "history persisted");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to persist history; will retry on next save");
                false
            }
        }
    }
}
