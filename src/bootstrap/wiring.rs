//! Dependency wiring
//! 依赖注入：把平台与基础设施适配器装配成流水线

use std::sync::Arc;

use anyhow::{Context, Result};
use hp_app::app_paths::AppPaths;
use hp_app::{PipelineCoordinator, PipelineDeps, SettingsStore};
use hp_core::ports::{AppDirsPort, NotificationPort, SettingsPort};
use hp_infra::converter::PandocConverter;
use hp_infra::fs::FsArtifactStore;
use hp_infra::settings::FileSettingsRepository;
use hp_infra::SystemClock;
use hp_platform::app_dirs::DirsAppDirsAdapter;
use hp_platform::clipboard::LocalClipboard;
use hp_platform::host::OfficeAutomationHost;
use hp_platform::input::EnigoKeystrokes;
use hp_platform::notify::DesktopNotifier;
use hp_platform::opener::DefaultAppOpener;
use hp_platform::system::{NativeWindowFocus, SysinfoInspector};
use tracing::info;

/// Everything the daemon and the one-shot mode need.
pub struct AppRuntime {
    pub paths: AppPaths,
    pub coordinator: Arc<PipelineCoordinator>,
    pub settings: Arc<SettingsStore>,
    pub settings_repo: Arc<dyn SettingsPort>,
    pub notifier: Arc<dyn NotificationPort>,
}

pub fn resolve_paths() -> Result<AppPaths> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("resolve app directories failed")?;
    Ok(AppPaths::from_app_dirs(&app_dirs))
}

/// Load the configuration and build the pipeline.
///
/// An invalid configuration file aborts startup; a missing one means defaults.
pub async fn build_runtime() -> Result<AppRuntime> {
    let paths = resolve_paths()?;
    let repo: Arc<dyn SettingsPort> = Arc::new(FileSettingsRepository::new(&paths.settings_path));

    let settings = repo
        .load()
        .await
        .with_context(|| format!("load config failed: {}", paths.settings_path.display()))?;
    info!(
        path = %paths.settings_path.display(),
        hotkey = %settings.hotkey,
        converter = %settings.converter_path,
        "config loaded"
    );
    let settings = Arc::new(SettingsStore::new(settings));

    let notifier: Arc<dyn NotificationPort> = Arc::new(DesktopNotifier::new());
    let deps = PipelineDeps {
        clipboard: Arc::new(LocalClipboard::new()?),
        clock: Arc::new(SystemClock),
        converter: Arc::new(PandocConverter::new()),
        artifacts: Arc::new(FsArtifactStore::new()),
        inspector: Arc::new(SysinfoInspector::new()),
        focus: Arc::new(NativeWindowFocus::new()),
        keystrokes: Arc::new(EnigoKeystrokes::new()),
        document_host: Arc::new(OfficeAutomationHost::new()),
        opener: Arc::new(DefaultAppOpener::new()),
        notifier: Arc::clone(&notifier),
    };

    Ok(AppRuntime {
        paths,
        coordinator: Arc::new(PipelineCoordinator::new(deps, Arc::clone(&settings))),
        settings,
        settings_repo: repo,
        notifier,
    })
}
