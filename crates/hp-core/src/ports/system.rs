use anyhow::Result;

use crate::target::{AppHandle, SystemSnapshot};

/// Gathers running processes and the foreground window.
pub trait SystemInspectorPort: Send + Sync {
    fn snapshot(&self) -> Result<SystemSnapshot>;
}

pub trait WindowFocusPort: Send + Sync {
    /// Bring the target's window to the foreground before delivery.
    fn bring_to_front(&self, handle: &AppHandle) -> Result<()>;
}
