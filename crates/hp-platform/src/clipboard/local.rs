use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clipboard_rs::ClipboardContext;
use hp_core::ports::ClipboardPort;
use hp_core::{ClipboardContents, ClipboardPayload};
use tracing::debug;

use super::common::CommonClipboardImpl;

const MAX_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_millis(30);

/// System clipboard backed by clipboard-rs.
///
/// Another process may hold the clipboard open for a moment (Windows is
/// notorious for it), so every operation is retried a few times.
pub struct LocalClipboard {
    inner: Mutex<ClipboardContext>,
}

impl LocalClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow!("Failed to create clipboard context: {}", e))?;
        Ok(Self {
            inner: Mutex::new(context),
        })
    }

    fn with_retry<T>(&self, op: &str, f: impl Fn(&ClipboardContext) -> Result<T>) -> Result<T> {
        let ctx = self
            .inner
            .lock()
            .map_err(|_| anyhow!("clipboard context lock poisoned"))?;

        retry(op, MAX_ATTEMPTS, RETRY_DELAY, || f(&*ctx))
    }
}

/// Run `f` up to `attempts` times, sleeping `delay` between failures.
///
/// The last error is returned with the operation name as context.
fn retry<T>(
    op: &str,
    attempts: u32,
    delay: Duration,
    mut f: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut attempt = 1;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                debug!(op, attempt, error = %err, "clipboard busy, retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err.context(format!("clipboard {op} failed"))),
        }
    }
}

impl ClipboardPort for LocalClipboard {
    fn read_text(&self) -> Result<Option<String>> {
        self.with_retry("read", CommonClipboardImpl::read_text)
    }

    fn save_contents(&self) -> Result<ClipboardContents> {
        self.with_retry("save", CommonClipboardImpl::save_contents)
    }

    fn write_payload(&self, payload: &ClipboardPayload) -> Result<()> {
        self.with_retry("write", |ctx| CommonClipboardImpl::write_payload(ctx, payload))
    }

    fn restore(&self, contents: &ClipboardContents) -> Result<()> {
        self.with_retry("restore", |ctx| CommonClipboardImpl::restore(ctx, contents))
    }
}
