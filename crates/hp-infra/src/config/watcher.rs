use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, trace, warn};

/// The watched config file was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChanged {
    pub path: PathBuf,
}

/// Watches the config file's directory and emits a debounced event whenever
/// the file itself is modified or re-created.
///
/// Editors that save via rename show up as `Create`, so both kinds count.
/// The event fires once writes have been quiet for the debounce window, so
/// a truncate followed by a write is read only after the write lands.
pub struct ConfigWatcher {
    _watcher: Box<dyn Watcher + Send>,
    path: PathBuf,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Forwards a signal for every write to the config file.
fn make_event_handler(
    filename: OsString,
    touched: mpsc::Sender<()>,
) -> impl Fn(notify::Result<Event>) + Send + 'static {
    move |result| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "config watcher error");
                return;
            }
        };

        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        let touches_config = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|f| f == filename).unwrap_or(false));
        if touches_config {
            let _ = touched.send(());
        }
    }
}

/// Trailing-edge debounce: every signal restarts the window, one
/// `ConfigChanged` goes out when it expires. The thread exits once every
/// signal sender is gone.
fn spawn_debouncer(
    path: PathBuf,
    debounce: Duration,
    tx: UnboundedSender<ConfigChanged>,
) -> Result<mpsc::Sender<()>> {
    let (touched_tx, touched_rx) = mpsc::channel::<()>();

    std::thread::Builder::new()
        .name("config-debounce".into())
        .spawn(move || {
            while touched_rx.recv().is_ok() {
                loop {
                    match touched_rx.recv_timeout(debounce) {
                        Ok(()) => trace!("config change still settling"),
                        Err(RecvTimeoutError::Timeout) => break,
                        Err(RecvTimeoutError::Disconnected) => return,
                    }
                }

                info!(path = %path.display(), "config file changed");
                if tx.send(ConfigChanged { path: path.clone() }).is_err() {
                    error!("config change receiver dropped");
                    return;
                }
            }
        })
        .context("spawn config debounce thread failed")?;

    Ok(touched_tx)
}

impl ConfigWatcher {
    /// Start watching `config_path`. The parent directory is created if
    /// needed; the file itself may not exist yet.
    pub fn spawn(
        config_path: &Path,
        debounce: Duration,
    ) -> Result<(Self, UnboundedReceiver<ConfigChanged>)> {
        let filename = config_path
            .file_name()
            .context("config path has no file name")?
            .to_os_string();
        let parent = config_path
            .parent()
            .context("config path has no parent directory")?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create config dir failed: {}", parent.display()))?;
        let parent = parent
            .canonicalize()
            .unwrap_or_else(|_| parent.to_path_buf());
        let path = parent.join(&filename);

        let (tx, rx) = unbounded_channel();
        let touched = spawn_debouncer(path.clone(), debounce, tx)?;

        let mut watcher = Self::create_watcher(&filename, touched)?;
        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .with_context(|| format!("watch config dir failed: {}", parent.display()))?;

        info!(path = %path.display(), "config hot reload enabled");
        Ok((
            Self {
                _watcher: watcher,
                path,
            },
            rx,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Native backend first, polling as a fallback.
    fn create_watcher(
        filename: &OsString,
        touched: mpsc::Sender<()>,
    ) -> Result<Box<dyn Watcher + Send>> {
        let handler = make_event_handler(filename.clone(), touched.clone());

        match notify::recommended_watcher(handler) {
            Ok(w) => {
                debug!("config watcher: native backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                warn!(error = %e, "native watcher unavailable, falling back to polling");
                let handler = make_event_handler(filename.clone(), touched);
                let poll = PollWatcher::new(
                    handler,
                    NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
                )
                .context("create poll watcher failed")?;
                Ok(Box::new(poll))
            }
        }
    }
}
