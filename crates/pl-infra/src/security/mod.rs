mod cipher;
mod encrypted_image_store;
mod key_vault;

pub use cipher::{open, seal, AesGcmCipher};
pub use encrypted_image_store::{EncryptedImageStore, IMAGE_FILE_EXTENSION};
pub use key_vault::KeyVault;
