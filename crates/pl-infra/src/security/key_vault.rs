//! Key lifecycle: load, legacy migration, generation, rotation.
//!
//! The key's only persistent home is the credential store behind
//! [`SecureStoragePort`]. It is cached for the process lifetime after the
//! first successful resolution.

use std::sync::{Arc, Mutex, MutexGuard};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info, warn};

use pl_core::ports::{KeyVaultPort, SecureStorageError, SecureStoragePort};
use pl_core::security::{EncryptionError, EncryptionKey, SecretAddress};

pub struct KeyVault {
    storage: Arc<dyn SecureStoragePort>,
    current: SecretAddress,
    legacy: SecretAddress,
    cached: Mutex<Option<EncryptionKey>>,
}

impl KeyVault {
    /// Create a vault whose key lives at `(service, account)`.
    ///
    /// The legacy location is the same account without a service.
    pub fn new(
        storage: Arc<dyn SecureStoragePort>,
        service: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        let account = account.into();
        Self {
            storage,
            current: SecretAddress::new(service, account.clone()),
            legacy: SecretAddress::legacy(account),
            cached: Mutex::new(None),
        }
    }

    pub fn address(&self) -> &SecretAddress {
        &self.current
    }

    fn lock_cache(&self) -> MutexGuard<'_, Option<EncryptionKey>> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current-format entry: base64 text of the raw key bytes.
    fn load_current(&self) -> Result<Option<EncryptionKey>, SecureStorageError> {
        let Some(encoded) = self.storage.get(&self.current)? else {
            return Ok(None);
        };
        let decoded = match STANDARD.decode(&encoded) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(address = %self.current, error = %e, "stored key is not valid base64");
                return Ok(None);
            }
        };
        match EncryptionKey::from_bytes(&decoded) {
            Ok(key) => Ok(Some(key)),
            Err(e) => {
                warn!(address = %self.current, error = %e, "stored key has invalid length");
                Ok(None)
            }
        }
    }

    /// Legacy entry: raw key bytes, no service attribute.
    fn load_legacy(&self) -> Result<Option<EncryptionKey>, SecureStorageError> {
        let Some(raw) = self.storage.get(&self.legacy)? else {
            return Ok(None);
        };
        match EncryptionKey::from_bytes(&raw) {
            Ok(key) => Ok(Some(key)),
            Err(e) => {
                warn!(error = %e, "legacy key entry is unusable");
                Ok(None)
            }
        }
    }

    /// Delete-then-add, so at most one entry exists at the address.
    fn store(&self, key: &EncryptionKey) -> Result<(), SecureStorageError> {
        if let Err(e) = self.storage.delete(&self.current) {
            debug!(error = %e, "pre-save delete failed");
        }
        let encoded = STANDARD.encode(key.as_bytes());
        self.storage.add(&self.current, encoded.as_bytes())
    }

    fn migrate_legacy(&self, key: &EncryptionKey) -> Result<(), SecureStorageError> {
        self.store(key)?;
        if let Err(e) = self.storage.delete(&self.legacy) {
            warn!(error = %e, "failed to delete legacy key entry after migration");
        }
        info!(address = %self.current, "migrated legacy encryption key");
        Ok(())
    }
}

impl KeyVault {
    /// Cache, current entry, legacy entry (migrated), or a new stored key.
    fn resolve(
        &self,
        cache: &mut Option<EncryptionKey>,
    ) -> Result<EncryptionKey, EncryptionError> {
        if let Some(key) = cache.as_ref() {
            return Ok(key.clone());
        }

        match self.load_current() {
            Ok(Some(key)) => {
                debug!("loaded encryption key from secure storage");
                *cache = Some(key.clone());
                return Ok(key);
            }
            Ok(None) => {}
            Err(e) => {
                // An unreadable store may still hold the key; never generate over it.
                warn!(error = %e, "secure storage read failed");
                return Err(EncryptionError::KeyUnavailable(e.to_string()));
            }
        }

        let legacy = self.load_legacy().map_err(|e| {
            warn!(error = %e, "legacy key lookup failed");
            EncryptionError::KeyUnavailable(e.to_string())
        })?;
        if let Some(key) = legacy {
            match self.migrate_legacy(&key) {
                Ok(()) => {
                    *cache = Some(key.clone());
                    return Ok(key);
                }
                Err(e) => warn!(error = %e, "legacy key migration failed"),
            }
        }

        let key = EncryptionKey::generate()?;
        match self.store(&key) {
            Ok(()) => {
                info!(address = %self.current, "generated new encryption key");
                *cache = Some(key.clone());
                Ok(key)
            }
            Err(e) => {
                warn!(error = %e, "failed to store new encryption key");
                Err(EncryptionError::KeyUnavailable(e.to_string()))
            }
        }
    }
}

impl KeyVaultPort for KeyVault {
    fn get_or_create_key(&self) -> Result<EncryptionKey, EncryptionError> {
        let mut cache = self.lock_cache();
        self.resolve(&mut cache)
    }

    fn has_stored_key(&self) -> Result<bool, EncryptionError> {
        if self.lock_cache().is_some() {
            return Ok(true);
        }
        match self.load_current().and_then(|current| match current {
            Some(_) => Ok(true),
            None => self.load_legacy().map(|legacy| legacy.is_some()),
        }) {
            Ok(stored) => Ok(stored),
            Err(e) => {
                warn!(error = %e, "cannot tell whether a key is stored");
                Err(EncryptionError::KeyUnavailable(e.to_string()))
            }
        }
    }

    fn rotate(&self) -> Result<(), EncryptionError> {
        let mut cache = self.lock_cache();
        // The pre-save delete removes the live entry, so the key it held must
        // be in hand before anything is written.
        let previous = self.resolve(&mut cache)?;
        let fresh = EncryptionKey::generate()?;

        match self.store(&fresh) {
            Ok(()) => {
                *cache = Some(fresh);
                info!(address = %self.current, "encryption key rotated");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to store rotated key");
                if let Err(restore_err) = self.store(&previous) {
                    warn!(error = %restore_err, "failed to restore previous key");
                }
                Err(EncryptionError::KeyUnavailable(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockState {
        entries: HashMap<SecretAddress, Vec<u8>>,
        fail_get: bool,
        fail_add: bool,
        refuse_next_adds: usize,
        adds: usize,
    }

    #[derive(Default)]
    struct MockStorage {
        state: Mutex<MockState>,
    }

    impl MockStorage {
        fn insert(&self, address: &SecretAddress, secret: &[u8]) {
            self.state
                .lock()
                .unwrap()
                .entries
                .insert(address.clone(), secret.to_vec());
        }

        fn raw(&self, address: &SecretAddress) -> Option<Vec<u8>> {
            self.state.lock().unwrap().entries.get(address).cloned()
        }

        fn set_fail_get(&self, fail: bool) {
            self.state.lock().unwrap().fail_get = fail;
        }

        fn set_fail_add(&self, fail: bool) {
            self.state.lock().unwrap().fail_add = fail;
        }

        fn refuse_next_adds(&self, count: usize) {
            self.state.lock().unwrap().refuse_next_adds = count;
        }

        fn adds(&self) -> usize {
            self.state.lock().unwrap().adds
        }
    }

    impl SecureStoragePort for MockStorage {
        fn add(&self, address: &SecretAddress, secret: &[u8]) -> Result<(), SecureStorageError> {
            let mut state = self.state.lock().unwrap();
            if state.fail_add {
                return Err(SecureStorageError::PermissionDenied("add refused".into()));
            }
            if state.refuse_next_adds > 0 {
                state.refuse_next_adds -= 1;
                return Err(SecureStorageError::PermissionDenied("add refused".into()));
            }
            if state.entries.contains_key(address) {
                return Err(SecureStorageError::AlreadyExists(address.to_string()));
            }
            state.adds += 1;
            state.entries.insert(address.clone(), secret.to_vec());
            Ok(())
        }

        fn get(&self, address: &SecretAddress) -> Result<Option<Vec<u8>>, SecureStorageError> {
            let state = self.state.lock().unwrap();
            if state.fail_get {
                return Err(SecureStorageError::PermissionDenied("get refused".into()));
            }
            Ok(state.entries.get(address).cloned())
        }

        fn delete(&self, address: &SecretAddress) -> Result<(), SecureStorageError> {
            self.state.lock().unwrap().entries.remove(address);
            Ok(())
        }
    }

    fn vault(storage: &Arc<MockStorage>) -> KeyVault {
        KeyVault::new(storage.clone(), "pastelet", "pastelet.encryptionKey")
    }

    #[test]
    fn generates_and_stores_key_on_first_use() {
        let storage = Arc::new(MockStorage::default());
        let vault = vault(&storage);
        assert_eq!(vault.has_stored_key(), Ok(false));

        let key = vault.get_or_create_key().expect("key");

        assert_eq!(vault.has_stored_key(), Ok(true));
        let stored = storage.raw(vault.address()).expect("stored entry");
        assert_eq!(STANDARD.decode(stored).unwrap(), key.as_bytes());
    }

    #[test]
    fn caches_key_for_process_lifetime() {
        let storage = Arc::new(MockStorage::default());
        let vault = vault(&storage);
        let first = vault.get_or_create_key().unwrap();

        storage.set_fail_get(true);
        let second = vault.get_or_create_key().unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.adds(), 1);
    }

    #[test]
    fn loads_existing_key_from_current_location() {
        let storage = Arc::new(MockStorage::default());
        let existing = EncryptionKey::from_bytes(&[9u8; 32]).unwrap();
        storage.insert(
            &SecretAddress::new("pastelet", "pastelet.encryptionKey"),
            STANDARD.encode(existing.as_bytes()).as_bytes(),
        );

        let key = vault(&storage).get_or_create_key().unwrap();

        assert_eq!(key, existing);
        assert_eq!(storage.adds(), 0);
    }

    #[test]
    fn migrates_legacy_key_once() {
        let storage = Arc::new(MockStorage::default());
        let legacy = SecretAddress::legacy("pastelet.encryptionKey");
        storage.insert(&legacy, &[5u8; 32]);
        let vault = vault(&storage);
        assert_eq!(vault.has_stored_key(), Ok(true));

        let key = vault.get_or_create_key().unwrap();

        assert_eq!(key.as_bytes(), &[5u8; 32]);
        assert!(storage.raw(&legacy).is_none(), "legacy entry removed");
        let current = storage.raw(vault.address()).expect("migrated entry");
        assert_eq!(STANDARD.decode(current).unwrap(), vec![5u8; 32]);

        // A fresh process finds the migrated entry; nothing left to migrate.
        let again = KeyVault::new(storage.clone(), "pastelet", "pastelet.encryptionKey");
        assert_eq!(again.get_or_create_key().unwrap(), key);
        assert_eq!(storage.adds(), 1);
    }

    #[test]
    fn invalid_stored_key_is_treated_as_absent() {
        let storage = Arc::new(MockStorage::default());
        let address = SecretAddress::new("pastelet", "pastelet.encryptionKey");
        storage.insert(&address, STANDARD.encode([1u8, 2, 3]).as_bytes());
        let vault = vault(&storage);

        assert_eq!(vault.has_stored_key(), Ok(false));
        let key = vault.get_or_create_key().unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn fails_when_store_refuses_read() {
        let storage = Arc::new(MockStorage::default());
        storage.set_fail_get(true);

        match vault(&storage).get_or_create_key() {
            Err(EncryptionError::KeyUnavailable(_)) => {}
            other => panic!("expected KeyUnavailable, got: {:?}", other),
        }
        assert_eq!(storage.adds(), 0);
    }

    #[test]
    fn unreadable_store_is_not_reported_as_keyless() {
        let storage = Arc::new(MockStorage::default());
        let existing = EncryptionKey::from_bytes(&[4u8; 32]).unwrap();
        storage.insert(
            &SecretAddress::new("pastelet", "pastelet.encryptionKey"),
            STANDARD.encode(existing.as_bytes()).as_bytes(),
        );
        storage.set_fail_get(true);
        let vault = vault(&storage);

        assert!(matches!(
            vault.has_stored_key(),
            Err(EncryptionError::KeyUnavailable(_))
        ));

        storage.set_fail_get(false);
        assert_eq!(vault.has_stored_key(), Ok(true));
        assert_eq!(vault.get_or_create_key().unwrap(), existing);
    }

    #[test]
    fn fails_when_store_refuses_write() {
        let storage = Arc::new(MockStorage::default());
        storage.set_fail_add(true);

        match vault(&storage).get_or_create_key() {
            Err(EncryptionError::KeyUnavailable(msg)) => assert!(msg.contains("add refused")),
            other => panic!("expected KeyUnavailable, got: {:?}", other),
        }
    }

    #[test]
    fn rotate_replaces_stored_and_cached_key() {
        let storage = Arc::new(MockStorage::default());
        let vault = vault(&storage);
        let old = vault.get_or_create_key().unwrap();

        vault.rotate().expect("rotate");

        let new = vault.get_or_create_key().unwrap();
        assert_ne!(old, new);
        let stored = storage.raw(vault.address()).unwrap();
        assert_eq!(STANDARD.decode(stored).unwrap(), new.as_bytes());
    }

    #[test]
    fn failed_rotation_before_first_use_restores_stored_key() {
        let storage = Arc::new(MockStorage::default());
        let existing = EncryptionKey::from_bytes(&[6u8; 32]).unwrap();
        let address = SecretAddress::new("pastelet", "pastelet.encryptionKey");
        storage.insert(&address, STANDARD.encode(existing.as_bytes()).as_bytes());
        storage.refuse_next_adds(1);

        // Nothing resolved in this process before the rotation.
        assert!(vault(&storage).rotate().is_err());

        let stored = storage.raw(&address).expect("previous key written back");
        assert_eq!(STANDARD.decode(stored).unwrap(), existing.as_bytes());
        assert_eq!(vault(&storage).get_or_create_key().unwrap(), existing);
    }

    #[test]
    fn rotation_refuses_when_current_key_unreadable() {
        let storage = Arc::new(MockStorage::default());
        let address = SecretAddress::new("pastelet", "pastelet.encryptionKey");
        storage.insert(&address, STANDARD.encode([6u8; 32]).as_bytes());
        storage.set_fail_get(true);

        assert!(matches!(
            vault(&storage).rotate(),
            Err(EncryptionError::KeyUnavailable(_))
        ));
        assert!(storage.raw(&address).is_some(), "stored key untouched");
        assert_eq!(storage.adds(), 0);
    }

    #[test]
    fn failed_rotation_keeps_previous_key() {
        let storage = Arc::new(MockStorage::default());
        let vault = vault(&storage);
        let old = vault.get_or_create_key().unwrap();

        storage.set_fail_add(true);
        assert!(vault.rotate().is_err());
        storage.set_fail_add(false);

        assert_eq!(vault.get_or_create_key().unwrap(), old);
    }
}
