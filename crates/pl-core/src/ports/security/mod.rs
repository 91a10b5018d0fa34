pub mod cipher;
pub mod key_vault;
pub mod secure_storage;
