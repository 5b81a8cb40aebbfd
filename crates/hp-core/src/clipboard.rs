//! Clipboard value types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Immutable capture of clipboard text taken when a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    pub text: String,
    pub captured_at_ms: i64,
}

impl ClipboardSnapshot {
    pub fn new(text: impl Into<String>, captured_at_ms: i64) -> Self {
        Self {
            text: text.into(),
            captured_at_ms,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Everything the clipboard held before we overwrote it, so it can be put back.
///
/// 粘贴前的剪贴板内容，粘贴完成后尽力恢复。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardContents {
    pub text: Option<String>,
    pub html: Option<String>,
    pub rtf: Option<String>,
    pub files: Vec<PathBuf>,
    pub png: Option<Vec<u8>>,
}

impl ClipboardContents {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.html.is_none()
            && self.rtf.is_none()
            && self.files.is_empty()
            && self.png.is_none()
    }
}

/// A multi-format clipboard write. Hosts pick the richest format they understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub plain: String,
    pub html: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_snapshot_is_blank() {
        assert!(ClipboardSnapshot::new(" \n\t ", 0).is_blank());
        assert!(!ClipboardSnapshot::new("x", 0).is_blank());
    }

    #[test]
    fn default_contents_are_empty() {
        assert!(ClipboardContents::default().is_empty());
        let contents = ClipboardContents {
            text: Some("a".into()),
            ..Default::default()
        };
        assert!(!contents.is_empty());
    }
}
