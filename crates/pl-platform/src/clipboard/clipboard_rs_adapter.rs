use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use clipboard_rs::{common::RustImage, Clipboard, ClipboardContext, ContentFormat, RustImageData};
use tracing::{debug, debug_span};

use pl_core::clipboard::{ChangeToken, ClipboardPayload, ClipboardRead};
use pl_core::ports::SystemClipboardPort;

use super::ChangeTracker;

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

/// System clipboard through clipboard-rs.
///
/// Source applications are not reported by clipboard-rs, so reads carry no
/// `source_app`.
pub struct ClipboardRsClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
    tracker: Mutex<ChangeTracker>,
}

impl ClipboardRsClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow!("Failed to create clipboard context: {}", e))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
            tracker: Mutex::new(ChangeTracker::new()),
        })
    }

    fn read_payload(&self) -> Result<Option<ClipboardPayload>> {
        let ctx = self
            .inner
            .lock()
            .map_err(|_| anyhow!("clipboard context lock poisoned"))?;

        if ctx.has(ContentFormat::Image) {
            if let Ok(img) = ctx.get_image() {
                if let Ok(png) = img.to_png() {
                    return Ok(Some(ClipboardPayload::Image(png.get_bytes().to_vec())));
                }
            }
        }

        if ctx.has(ContentFormat::Text) {
            if let Ok(text) = ctx.get_text() {
                return Ok(Some(ClipboardPayload::Text(text)));
            }
        }

        Ok(None)
    }

    fn observe(&self, payload: Option<&ClipboardPayload>) -> Result<ChangeToken> {
        let mut tracker = self
            .tracker
            .lock()
            .map_err(|_| anyhow!("change tracker lock poisoned"))?;
        Ok(tracker.observe(payload))
    }
}

impl SystemClipboardPort for ClipboardRsClipboard {
    fn change_token(&self) -> Result<ChangeToken> {
        let payload = self.read_payload()?;
        self.observe(payload.as_ref())
    }

    fn read(&self) -> Result<ClipboardRead> {
        let span = debug_span!("platform.clipboard.read");
        span.in_scope(|| {
            let payload = self.read_payload()?;
            debug!(payload = ?payload, "read system clipboard");
            Ok(ClipboardRead {
                payload,
                source_app: None,
            })
        })
    }

    fn write(&self, payload: ClipboardPayload) -> Result<()> {
        let span = debug_span!("platform.clipboard.write", payload = ?payload);
        span.in_scope(|| {
            {
                let ctx = self
                    .inner
                    .lock()
                    .map_err(|_| anyhow!("clipboard context lock poisoned"))?;
                map_clipboard_err(ctx.clear())?;
                match &payload {
                    ClipboardPayload::Text(text) => map_clipboard_err(ctx.set_text(text.clone()))?,
                    ClipboardPayload::Image(png) => {
                        let img = map_clipboard_err(RustImageData::from_bytes(png))?;
                        map_clipboard_err(ctx.set_image(img))?;
                    }
                }
            }
            // Fingerprint what the clipboard now holds: images come back
            // re-encoded, so the written bytes are not a reliable fingerprint.
            let written = self.read_payload()?;
            self.observe(written.as_ref())?;
            debug!("wrote system clipboard");
            Ok(())
        })
    }
}
