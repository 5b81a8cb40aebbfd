use std::path::Path;

use anyhow::{Context, Result};
use hp_core::ports::FileOpenerPort;
use tracing::info;

/// Opens files with whatever the OS associates with their extension.
#[derive(Default)]
pub struct DefaultAppOpener;

impl DefaultAppOpener {
    pub fn new() -> Self {
        Self
    }
}

impl FileOpenerPort for DefaultAppOpener {
    fn open(&self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "opening with default application");
        open::that(path).with_context(|| format!("Failed to open file: {}", path.display()))
    }
}
