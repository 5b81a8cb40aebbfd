//! File-system artifact store.
//!
//! Temp documents live under `<tmp>/hotpaste`; retained documents and
//! fallback files go to the configured save directory.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use hp_core::ports::ArtifactStorePort;
use hp_core::GeneratedDocument;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

const FILE_PREFIX: &str = "md_paste";

pub struct FsArtifactStore {
    temp_dir: PathBuf,
}

impl Default for FsArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FsArtifactStore {
    pub fn new() -> Self {
        Self::with_temp_dir(std::env::temp_dir().join("hotpaste"))
    }

    /// Use `temp_dir` for non-retained documents. The directory is created
    /// lazily on first use.
    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    /// `md_paste_20240131_120501_1a2b3c4d.docx`
    fn unique_name(extension: &str) -> String {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let id = Uuid::new_v4().simple().to_string();
        format!("{FILE_PREFIX}_{stamp}_{}.{extension}", &id[..8])
    }

    async fn ensure_dir(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create dir failed: {}", dir.display()))
    }
}

#[async_trait]
impl ArtifactStorePort for FsArtifactStore {
    async fn allocate_document(&self, save_dir: &str, retain: bool) -> Result<GeneratedDocument> {
        let dir = if retain {
            self.resolve_dir(save_dir)?
        } else {
            self.temp_dir.clone()
        };
        Self::ensure_dir(&dir).await?;

        let path = dir.join(Self::unique_name("docx"));
        debug!(path = %path.display(), retain, "document path allocated");
        Ok(GeneratedDocument {
            path,
            retained: retain,
        })
    }

    async fn publish_document(&self, doc: &GeneratedDocument, save_dir: &str) -> Result<PathBuf> {
        if doc.retained {
            return Ok(doc.path.clone());
        }

        let dir = self.resolve_dir(save_dir)?;
        Self::ensure_dir(&dir).await?;

        let file_name = doc
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| Self::unique_name("docx").into());
        let target = dir.join(file_name);
        fs::copy(&doc.path, &target).await.with_context(|| {
            format!(
                "copy document failed: {} -> {}",
                doc.path.display(),
                target.display()
            )
        })?;
        Ok(target)
    }

    async fn write_table(&self, save_dir: &str, extension: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.resolve_dir(save_dir)?;
        Self::ensure_dir(&dir).await?;

        let path = dir.join(Self::unique_name(extension));
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("write table failed: {}", path.display()))?;
        Ok(path)
    }

    async fn discard(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "temp document removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove failed: {}", path.display())),
        }
    }

    fn resolve_dir(&self, save_dir: &str) -> Result<PathBuf> {
        let expanded = shellexpand::full(save_dir)
            .map_err(|e| anyhow!("expand path {save_dir:?} failed: {e}"))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }
}
