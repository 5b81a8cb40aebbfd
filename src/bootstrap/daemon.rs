//! Long-running mode: hotkey presses drive the pipeline, config edits reload
//! settings.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use hp_app::usecases::ReloadSettings;
use hp_app::PipelineCoordinator;
use hp_core::error::{ConfigReloadError, PipelineError};
use hp_core::ports::{Notification, NotificationPort};
use hp_core::PipelineResult;
use hp_infra::config::ConfigWatcher;
use hp_platform::hotkey::HotkeyListener;
use hp_platform::instance::InstanceLock;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{error, info, warn};

use super::wiring::AppRuntime;

const CONFIG_DEBOUNCE: Duration = Duration::from_millis(300);
// Lets the detached popup thread finish before the process exits.
const NOTIFY_GRACE: Duration = Duration::from_millis(500);

pub async fn run_daemon(runtime: AppRuntime) -> Result<()> {
    let _instance = InstanceLock::acquire(&runtime.paths.data_dir)?;
    let settings = runtime.settings.current();
    let binding = settings.hotkey_binding()?;
    let mut hotkeys = HotkeyListener::spawn(&binding, settings.trigger_debounce())?;

    let (watcher, mut config_changes) =
        match ConfigWatcher::spawn(&runtime.paths.settings_path, CONFIG_DEBOUNCE) {
            Ok((watcher, rx)) => (Some(watcher), rx),
            Err(err) => {
                warn!(error = %err, "config hot reload unavailable");
                (None, unbounded_channel().1)
            }
        };
    let hot_reload = watcher.is_some();
    let reload = ReloadSettings::new(
        Arc::clone(&runtime.settings_repo),
        Arc::clone(&runtime.settings),
    );

    info!(hotkey = %binding, "hotpaste is running, press Ctrl+C to quit");

    loop {
        tokio::select! {
            pressed = hotkeys.recv() => match pressed {
                Some(event) => {
                    info!(at_ms = event.at_ms, "hotkey pressed");
                    fire(&runtime.coordinator);
                }
                None => bail!("global hotkey listener stopped"),
            },
            Some(change) = config_changes.recv(), if hot_reload => {
                info!(path = %change.path.display(), "reloading config");
                if let Err(err) = reload.execute().await {
                    report_reload_failure(&runtime, err);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    drop(watcher);
    Ok(())
}

fn fire(coordinator: &Arc<PipelineCoordinator>) {
    let Some(handle) = coordinator.fire() else {
        return;
    };
    tokio::spawn(async move {
        if let Err(err) = handle.await {
            error!(error = %err, "pipeline task panicked");
        }
    });
}

fn report_reload_failure(runtime: &AppRuntime, err: ConfigReloadError) {
    let result = PipelineResult::Failure(PipelineError::ConfigReload(err));
    runtime.notifier.notify(&Notification {
        title: "hotpaste: config not reloaded".to_string(),
        body: result.message(),
        result,
        show_desktop: runtime.settings.current().notify,
    });
}

/// One pipeline run, for setups where the OS or another tool owns the shortcut.
pub async fn run_single(runtime: AppRuntime, delay_ms: u64) -> Result<()> {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    let report = runtime.coordinator.run_once().await;
    let show_desktop = runtime.settings.current().notify;
    println!("{}", report.result.message());
    if show_desktop {
        tokio::time::sleep(NOTIFY_GRACE).await;
    }

    match report.result {
        PipelineResult::Failure(err) => bail!("run failed [{}]: {err}", err.code()),
        _ => Ok(()),
    }
}
