use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use pl_core::ports::{SecureStorageError, SecureStoragePort};
use pl_core::security::SecretAddress;

/// Process-local credential store for headless runs and tests.
///
/// Secrets vanish with the process, so history sealed under them cannot be
/// read back by a later run.
#[derive(Debug, Default)]
pub struct InMemorySecureStorage {
    entries: Mutex<HashMap<SecretAddress, Vec<u8>>>,
}

impl InMemorySecureStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<SecretAddress, Vec<u8>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl SecureStoragePort for InMemorySecureStorage {
    fn add(&self, address: &SecretAddress, secret: &[u8]) -> Result<(), SecureStorageError> {
        let mut entries = self.entries();
        if entries.contains_key(address) {
            return Err(SecureStorageError::AlreadyExists(address.to_string()));
        }
        entries.insert(address.clone(), secret.to_vec());
        Ok(())
    }

    fn get(&self, address: &SecretAddress) -> Result<Option<Vec<u8>>, SecureStorageError> {
        Ok(self.entries().get(address).cloned())
    }

    fn delete(&self, address: &SecretAddress) -> Result<(), SecureStorageError> {
        self.entries().remove(address);
        Ok(())
    }
}
