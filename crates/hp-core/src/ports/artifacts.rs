use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use crate::pipeline::GeneratedDocument;

/// Owns the files a run produces.
///
/// Every allocated name is unique, so rapid triggers never collide.
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// Reserve a path for a converted document. Retained documents go to
    /// `save_dir`, others to the temp directory.
    async fn allocate_document(&self, save_dir: &str, retain: bool) -> Result<GeneratedDocument>;

    /// Copy a document into `save_dir` (no-op for retained ones) and return
    /// the published path.
    async fn publish_document(&self, doc: &GeneratedDocument, save_dir: &str) -> Result<PathBuf>;

    /// Write a rendered table into `save_dir`.
    async fn write_table(&self, save_dir: &str, extension: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Remove a non-retained document. Missing files are not an error.
    async fn discard(&self, path: &Path) -> Result<()>;

    /// Resolve `~` and environment variables in `save_dir`.
    fn resolve_dir(&self, save_dir: &str) -> Result<PathBuf>;
}
