use anyhow::Result;

use crate::clipboard::{ChangeToken, ClipboardPayload, ClipboardRead};

/// The system clipboard device.
///
/// The device offers no change subscription, only a token that moves
/// whenever its content changes; callers poll it.
pub trait SystemClipboardPort: Send + Sync {
    /// Current change token.
    fn change_token(&self) -> Result<ChangeToken>;

    /// Read current content, checking the image slot before the text slot.
    fn read(&self) -> Result<ClipboardRead>;

    /// Clear the clipboard and write exactly one payload.
    fn write(&self, payload: ClipboardPayload) -> Result<()>;
}
