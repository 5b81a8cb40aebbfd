use std::path::Path;

use anyhow::Result;

pub trait FileOpenerPort: Send + Sync {
    /// Open `path` with the OS default application.
    fn open(&self, path: &Path) -> Result<()>;
}
