//! Use case for reloading the configuration file
//! 重新加载配置文件的用例

use std::sync::Arc;

use hp_core::error::ConfigReloadError;
use hp_core::ports::SettingsPort;
use hp_core::Settings;
use tracing::{info, info_span, warn, Instrument};

use crate::settings_store::SettingsStore;

/// Reload settings atomically.
///
/// ## Behavior / 行为
/// - Reads and validates the whole file first
/// - Swaps the active snapshot only when validation passes
/// - On any error the previous configuration stays active
pub struct ReloadSettings {
    repo: Arc<dyn SettingsPort>,
    store: Arc<SettingsStore>,
}

impl ReloadSettings {
    pub fn new(repo: Arc<dyn SettingsPort>, store: Arc<SettingsStore>) -> Self {
        Self { repo, store }
    }

    pub async fn execute(&self) -> Result<Arc<Settings>, ConfigReloadError> {
        let span = info_span!(
            "usecase.reload_settings.execute",
            path = %self.repo.location().display()
        );

        async {
            let loaded = self.repo.load().await.map_err(|err| {
                match err.downcast::<ConfigReloadError>() {
                    Ok(typed) => typed,
                    Err(other) => ConfigReloadError::Read(format!("{other:#}")),
                }
            });

            let settings = match loaded.and_then(|s| s.validate().map(|_| s)) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(error = %err, "config reload rejected, keeping previous config");
                    return Err(err);
                }
            };

            let previous = self.store.current();
            if previous.hotkey != settings.hotkey {
                warn!(
                    old = %previous.hotkey,
                    new = %settings.hotkey,
                    "hotkey changed; restart to rebind"
                );
            }

            let active = self.store.replace(settings);
            info!("config reloaded");
            Ok(active)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;

    struct StubRepo {
        next: Mutex<Option<anyhow::Result<Settings>>>,
        path: PathBuf,
    }

    impl StubRepo {
        fn returning(result: anyhow::Result<Settings>) -> Self {
            Self {
                next: Mutex::new(Some(result)),
                path: PathBuf::from("/tmp/config.toml"),
            }
        }
    }

    #[async_trait]
    impl SettingsPort for StubRepo {
        async fn load(&self) -> anyhow::Result<Settings> {
            self.next.lock().unwrap().take().expect("load called once")
        }

        async fn save(&self, _settings: &Settings) -> anyhow::Result<()> {
            Ok(())
        }

        fn location(&self) -> &Path {
            &self.path
        }
    }

    #[tokio::test]
    async fn valid_file_replaces_active_config() {
        let store = Arc::new(SettingsStore::new(Settings::default()));
        let repo = StubRepo::returning(Ok(Settings {
            preserve_table_styles: false,
            ..Settings::default()
        }));

        let active = ReloadSettings::new(Arc::new(repo), Arc::clone(&store))
            .execute()
            .await
            .unwrap();

        assert!(!active.preserve_table_styles);
        assert!(!store.current().preserve_table_styles);
    }

    #[tokio::test]
    async fn parse_error_keeps_previous_config() {
        let store = Arc::new(SettingsStore::new(Settings::default()));
        let repo = StubRepo::returning(Err(ConfigReloadError::Parse("bad toml".into()).into()));

        let err = ReloadSettings::new(Arc::new(repo), Arc::clone(&store))
            .execute()
            .await
            .unwrap_err();

        assert_eq!(err, ConfigReloadError::Parse("bad toml".into()));
        assert!(store.current().preserve_table_styles);
    }

    #[tokio::test]
    async fn invalid_values_are_rejected_before_swap() {
        let store = Arc::new(SettingsStore::new(Settings::default()));
        let repo = StubRepo::returning(Ok(Settings {
            converter_path: "  ".into(),
            notify: false,
            ..Settings::default()
        }));

        let err = ReloadSettings::new(Arc::new(repo), Arc::clone(&store))
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigReloadError::Invalid(_)));
        assert!(store.current().notify);
    }

    #[tokio::test]
    async fn io_errors_map_to_read_errors() {
        let store = Arc::new(SettingsStore::new(Settings::default()));
        let repo = StubRepo::returning(Err(anyhow::anyhow!("permission denied")));

        let err = ReloadSettings::new(Arc::new(repo), store)
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, ConfigReloadError::Read(ref m) if m.contains("permission denied")));
    }
}
