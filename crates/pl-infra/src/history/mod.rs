mod encrypted_store;

pub use encrypted_store::{EncryptedHistoryStore, HISTORY_STATE_KEY};
