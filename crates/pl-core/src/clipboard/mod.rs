//! Clipboard facts as observed by the platform layer.

/// Opaque value that changes whenever the system clipboard content changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChangeToken(pub u64);

impl std::fmt::Display for ChangeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One clipboard payload. Images are carried as PNG bytes.
#[derive(Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    Image(Vec<u8>),
    Text(String),
}

impl std::fmt::Debug for ClipboardPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Clipboard content may be sensitive; log only its shape.
        match self {
            ClipboardPayload::Image(bytes) => write!(f, "Image({} bytes)", bytes.len()),
            ClipboardPayload::Text(text) => write!(f, "Text({} chars)", text.chars().count()),
        }
    }
}

/// What a single clipboard read produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardRead {
    /// Highest-priority payload present: image before text.
    pub payload: Option<ClipboardPayload>,

    /// Identifier of the application that owns the clipboard, when the
    /// platform reports it.
    pub source_app: Option<String>,
}

impl ClipboardRead {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: Some(ClipboardPayload::Text(text.into())),
            source_app: None,
        }
    }

    pub fn image(png: Vec<u8>) -> Self {
        Self {
            payload: Some(ClipboardPayload::Image(png)),
            source_app: None,
        }
    }

    pub fn from_app(mut self, app_id: impl Into<String>) -> Self {
        self.source_app = Some(app_id.into());
        self
    }
}
