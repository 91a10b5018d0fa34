use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BlobId, EntryId};

/// Preview text stored for every image entry.
pub const IMAGE_PREVIEW_LABEL: &str = "Image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Text,
    Image,
}

/// One captured clipboard snapshot.
///
/// The serialized field names are the persisted history schema and must not
/// change: records written before encryption was introduced are still read
/// back through the plaintext fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,

    /// Captured text for `Text`, [`IMAGE_PREVIEW_LABEL`] for `Image`.
    #[serde(rename = "content")]
    pub text_preview: String,

    #[serde(rename = "date")]
    pub captured_at: DateTime<Utc>,

    #[serde(rename = "type", default)]
    pub kind: EntryKind,

    /// Set iff `kind == Image`.
    #[serde(rename = "imageID", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<BlobId>,
}

impl HistoryEntry {
    pub fn text(content: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            text_preview: content.into(),
            captured_at,
            kind: EntryKind::Text,
            image_ref: None,
        }
    }

    pub fn image(blob_id: BlobId, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            text_preview: IMAGE_PREVIEW_LABEL.to_string(),
            captured_at,
            kind: EntryKind::Image,
            image_ref: Some(blob_id),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == EntryKind::Text
    }

    pub fn is_image(&self) -> bool {
        self.kind == EntryKind::Image
    }

    /// Checks the `image_ref` iff `Image` invariant.
    pub fn is_well_formed(&self) -> bool {
        match self.kind {
            EntryKind::Text => self.image_ref.is_none(),
            EntryKind::Image => self.image_ref.is_some(),
        }
    }

    /// Dedup equality.
    ///
    /// - `Image` vs `Image`: same blob identity
    /// - `Text` vs `Text`: same raw content
    /// - different kinds: never equal
    pub fn is_duplicate_of(&self, other: &HistoryEntry) -> bool {
        match (self.kind, other.kind) {
            (EntryKind::Image, EntryKind::Image) => match (&self.image_ref, &other.image_ref) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            (EntryKind::Text, EntryKind::Text) => self.text_preview == other.text_preview,
            _ => false,
        }
    }
}
