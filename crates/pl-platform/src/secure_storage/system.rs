use keyring::Entry;
use tracing::debug;

use pl_core::ports::{SecureStorageError, SecureStoragePort};
use pl_core::security::SecretAddress;

/// Service name used for entries addressed by account alone.
const LEGACY_SERVICE: &str = "";

trait KeyringEntryOps {
    fn get_secret(&self) -> Result<Vec<u8>, keyring::Error>;
    fn set_secret(&self, secret: &[u8]) -> Result<(), keyring::Error>;
    fn delete_credential(&self) -> Result<(), keyring::Error>;
}

trait KeyringBackend: Send + Sync {
    type Entry: KeyringEntryOps;
    fn new_entry(&self, service: &str, account: &str) -> Result<Self::Entry, keyring::Error>;
}

struct RealBackend;

struct RealEntry {
    inner: Entry,
}

impl KeyringEntryOps for RealEntry {
    fn get_secret(&self) -> Result<Vec<u8>, keyring::Error> {
        self.inner.get_secret()
    }

    fn set_secret(&self, secret: &[u8]) -> Result<(), keyring::Error> {
        self.inner.set_secret(secret)
    }

    fn delete_credential(&self) -> Result<(), keyring::Error> {
        self.inner.delete_credential()
    }
}

impl KeyringBackend for RealBackend {
    type Entry = RealEntry;

    fn new_entry(&self, service: &str, account: &str) -> Result<Self::Entry, keyring::Error> {
        Entry::new(service, account).map(|inner| RealEntry { inner })
    }
}

fn map_keyring_err(op: &str, err: keyring::Error) -> SecureStorageError {
    match err {
        keyring::Error::PlatformFailure(msg) => {
            SecureStorageError::PermissionDenied(format!("{op}: {msg}"))
        }
        keyring::Error::NoStorageAccess(msg) => {
            SecureStorageError::Unavailable(format!("{op}: {msg}"))
        }
        keyring::Error::BadEncoding(_) => {
            SecureStorageError::Corrupt(format!("{op}: stored secret has a bad encoding"))
        }
        other => SecureStorageError::Other(format!("{op}: {other}")),
    }
}

fn entry_for<B: KeyringBackend>(
    backend: &B,
    address: &SecretAddress,
) -> Result<B::Entry, SecureStorageError> {
    let service = address.service.as_deref().unwrap_or(LEGACY_SERVICE);
    backend.new_entry(service, &address.account).map_err(|e| {
        SecureStorageError::Other(format!("failed to create keyring entry {address}: {e}"))
    })
}

fn get_with_backend<B: KeyringBackend>(
    backend: &B,
    address: &SecretAddress,
) -> Result<Option<Vec<u8>>, SecureStorageError> {
    let entry = entry_for(backend, address)?;
    match entry.get_secret() {
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(map_keyring_err("read secure storage", e)),
    }
}

fn add_with_backend<B: KeyringBackend>(
    backend: &B,
    address: &SecretAddress,
    secret: &[u8],
) -> Result<(), SecureStorageError> {
    let entry = entry_for(backend, address)?;
    // keyring overwrites on set; refuse explicitly so callers must delete first.
    match entry.get_secret() {
        Ok(_) => return Err(SecureStorageError::AlreadyExists(address.to_string())),
        Err(keyring::Error::NoEntry) => {}
        Err(e) => return Err(map_keyring_err("check secure storage", e)),
    }
    entry
        .set_secret(secret)
        .map_err(|e| map_keyring_err("write secure storage", e))?;
    debug!(%address, "keyring entry added");
    Ok(())
}

fn delete_with_backend<B: KeyringBackend>(
    backend: &B,
    address: &SecretAddress,
) -> Result<(), SecureStorageError> {
    let entry = entry_for(backend, address)?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(map_keyring_err("delete secure storage", e)),
    }
}

/// OS keychain-backed secure storage.
#[derive(Debug, Clone, Default)]
pub struct SystemSecureStorage;

impl SystemSecureStorage {
    pub fn new() -> Self {
        Self
    }
}

impl SecureStoragePort for SystemSecureStorage {
    fn add(&self, address: &SecretAddress, secret: &[u8]) -> Result<(), SecureStorageError> {
        add_with_backend(&RealBackend, address, secret)
    }

    fn get(&self, address: &SecretAddress) -> Result<Option<Vec<u8>>, SecureStorageError> {
        get_with_backend(&RealBackend, address)
    }

    fn delete(&self, address: &SecretAddress) -> Result<(), SecureStorageError> {
        delete_with_backend(&RealBackend, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    #[derive(Default)]
    struct MockState {
        entries: HashMap<(String, String), Vec<u8>>,
        get_error: Option<keyring::Error>,
        set_error: Option<keyring::Error>,
        delete_error: Option<keyring::Error>,
    }

    #[derive(Clone, Default)]
    struct MockBackend {
        state: Arc<Mutex<MockState>>,
    }

    struct MockEntry {
        key: (String, String),
        state: Arc<Mutex<MockState>>,
    }

    impl MockBackend {
        fn insert_secret(&self, service: &str, account: &str, secret: Vec<u8>) {
            self.state
                .lock()
                .unwrap()
                .entries
                .insert((service.to_string(), account.to_string()), secret);
        }

        fn secret(&self, service: &str, account: &str) -> Option<Vec<u8>> {
            self.state
                .lock()
                .unwrap()
                .entries
                .get(&(service.to_string(), account.to_string()))
                .cloned()
        }

        fn set_get_error(&self, err: keyring::Error) {
            self.state.lock().unwrap().get_error = Some(err);
        }

        fn set_set_error(&self, err: keyring::Error) {
            self.state.lock().unwrap().set_error = Some(err);
        }

        fn set_delete_error(&self, err: keyring::Error) {
            self.state.lock().unwrap().delete_error = Some(err);
        }
    }

    impl KeyringBackend for MockBackend {
        type Entry = MockEntry;

        fn new_entry(&self, service: &str, account: &str) -> Result<Self::Entry, keyring::Error> {
            Ok(MockEntry {
                key: (service.to_string(), account.to_string()),
                state: Arc::clone(&self.state),
            })
        }
    }

    impl KeyringEntryOps for MockEntry {
        fn get_secret(&self) -> Result<Vec<u8>, keyring::Error> {
            let mut state = self.state.lock().unwrap();
            if let Some(err) = state.get_error.take() {
                return Err(err);
            }
            state
                .entries
                .get(&self.key)
                .cloned()
                .ok_or(keyring::Error::NoEntry)
        }

        fn set_secret(&self, secret: &[u8]) -> Result<(), keyring::Error> {
            let mut state = self.state.lock().unwrap();
            if let Some(err) = state.set_error.take() {
                return Err(err);
            }
            state.entries.insert(self.key.clone(), secret.to_vec());
            Ok(())
        }

        fn delete_credential(&self) -> Result<(), keyring::Error> {
            let mut state = self.state.lock().unwrap();
            if let Some(err) = state.delete_error.take() {
                return Err(err);
            }
            state
                .entries
                .remove(&self.key)
                .map(|_| ())
                .ok_or(keyring::Error::NoEntry)
        }
    }

    fn current() -> SecretAddress {
        SecretAddress::new("pastelet", "pastelet.encryptionKey")
    }

    #[test]
    fn get_missing_entry_returns_none() {
        let backend = MockBackend::default();
        assert_eq!(get_with_backend(&backend, &current()).unwrap(), None);
    }

    #[test]
    fn get_platform_failure_maps_to_permission_denied() {
        let backend = MockBackend::default();
        backend.set_get_error(keyring::Error::PlatformFailure("locked".into()));

        let err = get_with_backend(&backend, &current()).unwrap_err();
        assert!(matches!(err, SecureStorageError::PermissionDenied(_)));
    }

    #[test]
    fn add_writes_new_entry() {
        let backend = MockBackend::default();
        add_with_backend(&backend, &current(), b"secret").unwrap();

        assert_eq!(
            backend.secret("pastelet", "pastelet.encryptionKey"),
            Some(b"secret".to_vec())
        );
    }

    #[test]
    fn add_refuses_existing_entry() {
        let backend = MockBackend::default();
        backend.insert_secret("pastelet", "pastelet.encryptionKey", b"old".to_vec());

        let err = add_with_backend(&backend, &current(), b"new").unwrap_err();

        assert!(matches!(err, SecureStorageError::AlreadyExists(_)));
        assert_eq!(
            backend.secret("pastelet", "pastelet.encryptionKey"),
            Some(b"old".to_vec())
        );
    }

    #[test]
    fn add_surfaces_write_failure() {
        let backend = MockBackend::default();
        backend.set_set_error(keyring::Error::NoStorageAccess("no keychain".into()));

        let err = add_with_backend(&backend, &current(), b"secret").unwrap_err();
        assert!(matches!(err, SecureStorageError::Unavailable(_)));
    }

    #[test]
    fn legacy_address_uses_empty_service() {
        let backend = MockBackend::default();
        backend.insert_secret("", "pastelet.encryptionKey", vec![7; 32]);

        let legacy = SecretAddress::legacy("pastelet.encryptionKey");
        assert_eq!(get_with_backend(&backend, &legacy).unwrap(), Some(vec![7; 32]));
        assert_eq!(get_with_backend(&backend, &current()).unwrap(), None);
    }

    #[test]
    fn delete_missing_entry_is_ok() {
        let backend = MockBackend::default();
        delete_with_backend(&backend, &current()).unwrap();
    }

    #[test]
    fn delete_failure_is_reported() {
        let backend = MockBackend::default();
        backend.insert_secret("pastelet", "pastelet.encryptionKey", b"x".to_vec());
        backend.set_delete_error(keyring::Error::PlatformFailure("denied".into()));

        let err = delete_with_backend(&backend, &current()).unwrap_err();
        assert!(matches!(err, SecureStorageError::PermissionDenied(_)));
    }
}
