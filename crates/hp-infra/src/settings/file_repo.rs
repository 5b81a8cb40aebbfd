use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use hp_core::{ports::SettingsPort, settings::model::Settings};
use tokio::fs;
use tracing::info;

/// TOML-backed settings file.
pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.dir() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create settings dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the target.
    async fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir().await?;

        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp settings failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp settings to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// 首次运行时写出默认配置，返回是否新建了文件
    pub async fn init_default_if_missing(&self) -> Result<bool> {
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(false);
        }
        self.save(&Settings::default()).await?;
        info!(path = %self.path.display(), "default config written");
        Ok(true)
    }
}

#[async_trait]
impl SettingsPort for FileSettingsRepository {
    /// Missing file means defaults. Parse and validation failures surface as
    /// `ConfigReloadError` inside the returned error.
    async fn load(&self) -> Result<Settings> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read settings failed: {}", self.path.display()))
            }
        };

        Ok(Settings::from_toml(&content)?)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let content = settings.to_toml().context("serialize settings failed")?;
        self.atomic_write(&content).await
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
