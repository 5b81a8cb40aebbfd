use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::target::HostFamily;

/// Office automation: insert a document at the host's cursor.
#[async_trait]
pub trait DocumentHostPort: Send + Sync {
    async fn insert_file(&self, host: HostFamily, path: &Path) -> Result<()>;
}
