use pl_core::clipboard::{ChangeToken, ClipboardPayload};

/// Derives a change counter from content fingerprints.
///
/// clipboard-rs exposes no change count, so the token advances whenever the
/// fingerprint of the highest-priority payload differs from the last one seen.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    last: Option<blake3::Hash>,
    counter: u64,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, payload: Option<&ClipboardPayload>) -> ChangeToken {
        let fingerprint = fingerprint(payload);
        if self.last != Some(fingerprint) {
            self.last = Some(fingerprint);
            self.counter = self.counter.wrapping_add(1);
        }
        ChangeToken(self.counter)
    }

    pub fn current(&self) -> ChangeToken {
        ChangeToken(self.counter)
    }
}

fn fingerprint(payload: Option<&ClipboardPayload>) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    match payload {
        Some(ClipboardPayload::Image(png)) => {
            hasher.update(b"image\0");
            hasher.update(png);
        }
        Some(ClipboardPayload::Text(text)) => {
            hasher.update(b"text\0");
            hasher.update(text.as_bytes());
        }
        None => {
            hasher.update(b"empty\0");
        }
    }
    hasher.finalize()
}
