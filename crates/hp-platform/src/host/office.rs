use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use hp_core::ports::DocumentHostPort;
use hp_core::target::HostFamily;
use tokio::process::Command;
use tracing::{debug, info, info_span, warn, Instrument};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const INSERT_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

/// Drives Word or WPS Writer through their scripting interfaces.
///
/// Windows goes through COM from PowerShell (`Selection.Range.InsertFile`),
/// macOS through AppleScript. Spreadsheets never take a document.
pub struct OfficeAutomationHost {
    timeout: Duration,
}

impl Default for OfficeAutomationHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OfficeAutomationHost {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// COM ProgIDs to try in order.
fn prog_ids(host: HostFamily) -> &'static [&'static str] {
    match host {
        HostFamily::MsWord => &["Word.Application"],
        HostFamily::WpsWriter => &["kwps.Application", "KWPS.Application"],
        HostFamily::MsExcel | HostFamily::WpsSpreadsheets => &[],
    }
}

fn powershell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Attach to a running instance, make sure a document is open, then insert
/// at the selection with a few retries while the host finishes loading.
#[cfg_attr(not(windows), allow(dead_code))]
fn powershell_script(host: HostFamily, path: &Path) -> Result<String> {
    let ids = prog_ids(host);
    if ids.is_empty() {
        bail!("{} cannot insert documents", host.display_name());
    }
    let ids = ids
        .iter()
        .map(|id| powershell_quote(id))
        .collect::<Vec<_>>()
        .join(",");
    let file = powershell_quote(&path.to_string_lossy());

    Ok(format!(
        r#"$ErrorActionPreference = 'Stop'
$app = $null
foreach ($id in @({ids})) {{
  try {{ $app = [Runtime.InteropServices.Marshal]::GetActiveObject($id); break }} catch {{ }}
}}
if ($null -eq $app) {{ throw 'no running {name} instance' }}
if ($app.Documents.Count -eq 0) {{ [void]$app.Documents.Add() }}
$attempt = 0
while ($true) {{
  try {{ $app.Selection.Range.InsertFile({file}); break }}
  catch {{
    $attempt++
    if ($attempt -ge {attempts}) {{ throw }}
    Start-Sleep -Milliseconds {delay}
  }}
}}
"#,
        name = host.display_name(),
        attempts = INSERT_ATTEMPTS,
        delay = RETRY_DELAY_MS,
    ))
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript(host: HostFamily, path: &Path) -> Result<String> {
    if host != HostFamily::MsWord {
        bail!(
            "{} cannot be automated on this platform",
            host.display_name()
        );
    }
    let file = crate::notify::escape_for_applescript(&path.to_string_lossy());
    Ok(format!(
        r#"tell application "Microsoft Word"
  activate
  insert file at text object of selection file name (POSIX file "{file}" as string)
end tell"#
    ))
}

fn insertion_command(host: HostFamily, path: &Path) -> Result<Command> {
    #[cfg(target_os = "windows")]
    {
        let script = powershell_script(host, path)?;
        let mut cmd = Command::new("powershell");
        cmd.args(["-NoProfile", "-NonInteractive", "-Command", &script]);
        // CREATE_NO_WINDOW
        cmd.creation_flags(0x0800_0000);
        Ok(cmd)
    }

    #[cfg(target_os = "macos")]
    {
        let script = applescript(host, path)?;
        let mut cmd = Command::new("osascript");
        cmd.arg("-e").arg(script);
        Ok(cmd)
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let _ = path;
        Err(anyhow!(
            "{} automation is not supported on this platform",
            host.display_name()
        ))
    }
}

#[async_trait]
impl DocumentHostPort for OfficeAutomationHost {
    async fn insert_file(&self, host: HostFamily, path: &Path) -> Result<()> {
        let span = info_span!("host.insert_file", host = host.display_name(), path = %path.display());

        async {
            let mut cmd = insertion_command(host, path)?;
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let child = cmd.spawn().context("spawn automation process failed")?;
            let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await
            {
                Ok(result) => result.context("wait for automation process failed")?,
                Err(_) => {
                    warn!(timeout_ms = self.timeout.as_millis() as u64, "automation timed out");
                    return Err(anyhow!(
                        "{} did not respond within {} s",
                        host.display_name(),
                        self.timeout.as_secs()
                    ));
                }
            };

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                debug!(status = ?output.status, %stderr, "automation failed");
                bail!("{} insertion failed: {}", host.display_name(), stderr);
            }

            info!("document inserted");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
