//! Clipboard port - abstracts system clipboard access

use anyhow::Result;

use crate::clipboard::{ClipboardContents, ClipboardPayload};

/// Blocking clipboard access. Callers run it off the async runtime.
pub trait ClipboardPort: Send + Sync {
    /// Current plain text, `None` when the clipboard holds no text.
    fn read_text(&self) -> Result<Option<String>>;

    /// Capture every format we know how to put back.
    fn save_contents(&self) -> Result<ClipboardContents>;

    /// Replace the clipboard with all formats of `payload` at once.
    fn write_payload(&self, payload: &ClipboardPayload) -> Result<()>;

    fn restore(&self, contents: &ClipboardContents) -> Result<()>;
}
