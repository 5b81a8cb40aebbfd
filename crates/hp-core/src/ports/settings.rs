use std::path::Path;

use async_trait::async_trait;

use crate::settings::model::Settings;

#[async_trait]
pub trait SettingsPort: Send + Sync {
    async fn load(&self) -> anyhow::Result<Settings>;
    async fn save(&self, settings: &Settings) -> anyhow::Result<()>;
    fn location(&self) -> &Path;
}
