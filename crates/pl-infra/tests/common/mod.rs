#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use pl_core::ports::{
    HistoryStorePort, KeyVaultPort, RecordCipherPort, SecureStorageError, SecureStoragePort,
    StateStorePort,
};
use pl_core::security::SecretAddress;
use pl_infra::{AesGcmCipher, EncryptedHistoryStore, FileStateStore, KeyVault};

pub const SERVICE: &str = "pastelet";
pub const ACCOUNT: &str = "pastelet.encryptionKey";

/// Credential store that can be wiped to simulate key loss, or locked to
/// simulate an unreadable store.
#[derive(Default)]
pub struct MemoryKeychain {
    entries: Mutex<HashMap<SecretAddress, Vec<u8>>>,
    locked: AtomicBool,
}

impl MemoryKeychain {
    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SecureStorageError> {
        if self.locked.load(Ordering::SeqCst) {
            return Err(SecureStorageError::PermissionDenied("locked".into()));
        }
        Ok(())
    }

    pub fn wipe(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn put(&self, address: SecretAddress, secret: Vec<u8>) {
        self.entries.lock().unwrap().insert(address, secret);
    }
}

impl SecureStoragePort for MemoryKeychain {
    fn add(&self, address: &SecretAddress, secret: &[u8]) -> Result<(), SecureStorageError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(address) {
            return Err(SecureStorageError::AlreadyExists(address.to_string()));
        }
        entries.insert(address.clone(), secret.to_vec());
        Ok(())
    }

    fn get(&self, address: &SecretAddress) -> Result<Option<Vec<u8>>, SecureStorageError> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(address).cloned())
    }

    fn delete(&self, address: &SecretAddress) -> Result<(), SecureStorageError> {
        self.check()?;
        self.entries.lock().unwrap().remove(address);
        Ok(())
    }
}

/// One "process": a fresh vault (empty key cache) over shared storage.
pub struct Stack {
    pub vault: Arc<KeyVault>,
    pub cipher: Arc<AesGcmCipher>,
    pub state: Arc<FileStateStore>,
    pub history: EncryptedHistoryStore,
}

impl Stack {
    pub fn open(tmp: &TempDir, keychain: &Arc<MemoryKeychain>) -> Self {
        let vault = Arc::new(KeyVault::new(keychain.clone(), SERVICE, ACCOUNT));
        let cipher = Arc::new(AesGcmCipher::new(vault.clone() as Arc<dyn KeyVaultPort>));
        let state = Arc::new(FileStateStore::new(tmp.path().join("state")));
        let history = EncryptedHistoryStore::new(
            state.clone() as Arc<dyn StateStorePort>,
            cipher.clone() as Arc<dyn RecordCipherPort>,
            vault.clone() as Arc<dyn KeyVaultPort>,
        );
        Self {
            vault,
            cipher,
            state,
            history,
        }
    }

    pub fn history(&self) -> &dyn HistoryStorePort {
        &self.history
    }
}
