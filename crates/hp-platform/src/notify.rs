//! Desktop notification delivery.
//!
//! - **macOS**: `osascript` `display notification`
//! - **Windows / Linux**: `notify_rust`

use hp_core::ports::{Notification, NotificationPort};
use hp_core::PipelineResult;
use tracing::{info, warn};

const TIMEOUT_MS: u32 = 4000;

/// Escape a string for an AppleScript double-quoted literal. Backslashes
/// must go first.
pub fn escape_for_applescript(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Fire-and-forget popup. Failures are logged only.
pub fn deliver_desktop_notification(title: &str, message: &str, timeout_ms: u32) {
    #[cfg(not(target_os = "macos"))]
    {
        if let Err(e) = notify_rust::Notification::new()
            .summary(title)
            .body(message)
            .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
            .show()
        {
            warn!(error = %e, "Failed to send desktop notification");
        }
    }

    #[cfg(target_os = "macos")]
    {
        let _ = timeout_ms;
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            escape_for_applescript(message),
            escape_for_applescript(title),
        );
        if let Err(e) = std::process::Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
        {
            warn!(error = %e, "Failed to send macOS desktop notification");
        }
    }
}

/// Logs every outcome and, when enabled, shows it as a desktop popup on a
/// detached thread so the pipeline never waits on the notification daemon.
#[derive(Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationPort for DesktopNotifier {
    fn notify(&self, notification: &Notification) {
        match &notification.result {
            PipelineResult::Failure(_) => {
                warn!(title = %notification.title, body = %notification.body, "notify")
            }
            _ => info!(title = %notification.title, body = %notification.body, "notify"),
        }

        if !notification.show_desktop {
            return;
        }

        let title = notification.title.clone();
        let body = notification.body.clone();
        let spawned = std::thread::Builder::new()
            .name("desktop-notify".into())
            .spawn(move || deliver_desktop_notification(&title, &body, TIMEOUT_MS));
        if let Err(e) = spawned {
            warn!(error = %e, "spawn notification thread failed");
        }
    }
}
