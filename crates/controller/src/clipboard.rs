//! Platform clipboard seam.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The platform refused access (e.g. no user gesture, permission prompt denied)
    PermissionDenied,
    /// No clipboard on this platform or session
    Unavailable,
    Other(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::PermissionDenied => write!(f, "clipboard access denied"),
            ClipboardError::Unavailable => write!(f, "clipboard unavailable"),
            ClipboardError::Other(msg) => write!(f, "clipboard error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Plain-text clipboard access.
pub trait ClipboardProvider {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard for headless use. Can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub text: String,
    pub deny: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            deny: false,
        }
    }

    pub fn denied() -> Self {
        Self {
            text: String::new(),
            deny: true,
        }
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        if self.deny {
            return Err(ClipboardError::PermissionDenied);
        }
        Ok(self.text.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.deny {
            return Err(ClipboardError::PermissionDenied);
        }
        self.text = text.to_string();
        Ok(())
    }
}
