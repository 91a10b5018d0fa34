use std::path::PathBuf;

use pl_core::ports::{AppDirsPort, SecureStoragePort};
use pl_core::security::SecretAddress;
use pl_core::AppConfig;
use pl_platform::{DirsAppDirsAdapter, InMemorySecureStorage};

#[test]
fn config_paths_hang_off_the_app_data_root() {
    let tmp = tempfile::tempdir().unwrap();
    let adapter = DirsAppDirsAdapter::with_base_data_local_dir(tmp.path().to_path_buf());

    let dirs = adapter.get_app_dirs().unwrap();
    let config = AppConfig::with_system_defaults(dirs.app_data_root.clone());

    assert!(config.image_dir().starts_with(&dirs.app_data_root));
    assert!(config.state_dir().ends_with(PathBuf::from("state")));
    assert!(config.logs_dir().ends_with(PathBuf::from("logs")));
}

#[test]
fn in_memory_store_behaves_like_a_keychain() {
    let store = InMemorySecureStorage::new();
    let address = SecretAddress::new("pastelet", "pastelet.encryptionKey");
    assert!(store.is_empty());

    store.add(&address, b"k1").unwrap();
    assert!(store.add(&address, b"k2").is_err());

    store.delete(&address).unwrap();
    store.add(&address, b"k2").unwrap();
    assert_eq!(store.get(&address).unwrap(), Some(b"k2".to_vec()));
}
