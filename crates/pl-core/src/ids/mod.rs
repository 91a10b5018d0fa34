mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Identifier of one history entry, stable for the entry's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

/// Identifier of one encrypted image blob. Doubles as the blob's file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(String);

impl_id!(EntryId, BlobId);
