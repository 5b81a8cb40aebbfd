//! Hand-written fakes for the pipeline ports.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hp_app::{PipelineCoordinator, PipelineDeps, SettingsStore};
use hp_core::clipboard::{ClipboardContents, ClipboardPayload};
use hp_core::error::ConversionError;
use hp_core::ports::*;
use hp_core::target::{ForegroundWindow, HostFamily, ProcessInfo};
use hp_core::{AppHandle, Settings, SystemSnapshot};
use hp_infra::fs::FsArtifactStore;
use tempfile::TempDir;
use tokio::sync::Notify;

#[derive(Default)]
pub struct FakeClipboard {
    pub text: Mutex<Option<String>>,
    pub reads: AtomicUsize,
    pub writes: Mutex<Vec<ClipboardPayload>>,
    pub restores: AtomicUsize,
}

impl FakeClipboard {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Mutex::new(Some(text.to_string())),
            ..Default::default()
        }
    }
}

impl ClipboardPort for FakeClipboard {
    fn read_text(&self) -> anyhow::Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.lock().unwrap().clone())
    }

    fn save_contents(&self) -> anyhow::Result<ClipboardContents> {
        Ok(ClipboardContents {
            text: self.text.lock().unwrap().clone(),
            ..Default::default()
        })
    }

    fn write_payload(&self, payload: &ClipboardPayload) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push(payload.clone());
        Ok(())
    }

    fn restore(&self, _contents: &ClipboardContents) -> anyhow::Result<()> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        1_700_000_000_000
    }
}

/// Writes a stub document; optionally fails or waits on a gate.
#[derive(Default)]
pub struct FakeConverter {
    pub requests: Mutex<Vec<ConversionRequest>>,
    pub fail_with: Option<ConversionError>,
    pub started: Option<Arc<Notify>>,
    pub gate: Option<Arc<Notify>>,
}

#[async_trait]
impl DocumentConverterPort for FakeConverter {
    async fn convert(&self, request: ConversionRequest) -> Result<PathBuf, ConversionError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(started) = &self.started {
            started.notify_one();
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        tokio::fs::write(&request.output, b"PK-stub-docx")
            .await
            .map_err(|e| ConversionError::Io(e.to_string()))?;
        Ok(request.output)
    }
}

pub struct FakeInspector {
    pub snapshot: SystemSnapshot,
    pub calls: AtomicUsize,
}

impl FakeInspector {
    pub fn running(processes: &[(u32, &str)], foreground: Option<u32>) -> Self {
        Self {
            snapshot: SystemSnapshot {
                processes: processes
                    .iter()
                    .map(|(pid, name)| ProcessInfo {
                        pid: *pid,
                        name: name.to_string(),
                    })
                    .collect(),
                foreground: foreground.map(|pid| ForegroundWindow {
                    pid,
                    window_id: Some(1),
                    title: None,
                }),
            },
            calls: AtomicUsize::new(0),
        }
    }
}

impl SystemInspectorPort for FakeInspector {
    fn snapshot(&self) -> anyhow::Result<SystemSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

#[derive(Default)]
pub struct FakeFocus {
    pub focused: Mutex<Vec<u32>>,
}

impl WindowFocusPort for FakeFocus {
    fn bring_to_front(&self, handle: &AppHandle) -> anyhow::Result<()> {
        self.focused.lock().unwrap().push(handle.pid);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeKeystrokes {
    pub pastes: AtomicUsize,
}

impl KeystrokePort for FakeKeystrokes {
    fn send_paste(&self) -> anyhow::Result<()> {
        self.pastes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records insertions; refuses them once `refuse` is set.
#[derive(Default)]
pub struct FakeHost {
    pub inserted: Mutex<Vec<(HostFamily, PathBuf, bool)>>,
    pub refuse: AtomicBool,
}

#[async_trait]
impl DocumentHostPort for FakeHost {
    async fn insert_file(&self, host: HostFamily, path: &Path) -> anyhow::Result<()> {
        let existed = path.exists();
        self.inserted
            .lock()
            .unwrap()
            .push((host, path.to_path_buf(), existed));
        if self.refuse.load(Ordering::SeqCst) {
            anyhow::bail!("host rejected the document");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeOpener {
    pub opened: Mutex<Vec<PathBuf>>,
}

impl FileOpenerPort for FakeOpener {
    fn open(&self, path: &Path) -> anyhow::Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl NotificationPort for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }
}

/// A coordinator wired to fakes, plus handles to inspect them.
pub struct Harness {
    pub coordinator: Arc<PipelineCoordinator>,
    pub clipboard: Arc<FakeClipboard>,
    pub converter: Arc<FakeConverter>,
    pub inspector: Arc<FakeInspector>,
    pub focus: Arc<FakeFocus>,
    pub keystrokes: Arc<FakeKeystrokes>,
    pub host: Arc<FakeHost>,
    pub opener: Arc<FakeOpener>,
    pub notifier: Arc<RecordingNotifier>,
    pub temp_dir: PathBuf,
    pub save_dir: PathBuf,
    _root: TempDir,
}

impl Harness {
    pub fn new(
        clipboard: FakeClipboard,
        converter: FakeConverter,
        inspector: FakeInspector,
        tweak: impl FnOnce(&mut Settings),
    ) -> Self {
        let root = tempfile::tempdir().unwrap();
        let temp_dir = root.path().join("tmp");
        let save_dir = root.path().join("saved");

        let mut settings = Settings {
            save_dir: save_dir.to_string_lossy().into_owned(),
            paste_settle_ms: 0,
            ..Settings::default()
        };
        tweak(&mut settings);

        let clipboard = Arc::new(clipboard);
        let converter = Arc::new(converter);
        let inspector = Arc::new(inspector);
        let focus = Arc::new(FakeFocus::default());
        let keystrokes = Arc::new(FakeKeystrokes::default());
        let host = Arc::new(FakeHost::default());
        let opener = Arc::new(FakeOpener::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let deps = PipelineDeps {
            clipboard: clipboard.clone(),
            clock: Arc::new(FixedClock),
            converter: converter.clone(),
            artifacts: Arc::new(FsArtifactStore::with_temp_dir(temp_dir.clone())),
            inspector: inspector.clone(),
            focus: focus.clone(),
            keystrokes: keystrokes.clone(),
            document_host: host.clone(),
            opener: opener.clone(),
            notifier: notifier.clone(),
        };
        let store = Arc::new(SettingsStore::new(settings));

        Self {
            coordinator: Arc::new(PipelineCoordinator::new(deps, store)),
            clipboard,
            converter,
            inspector,
            focus,
            keystrokes,
            host,
            opener,
            notifier,
            temp_dir,
            save_dir,
            _root: root,
        }
    }

    pub fn notification_count(&self) -> usize {
        self.notifier.notifications.lock().unwrap().len()
    }

    pub fn files_in(dir: &Path) -> Vec<PathBuf> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}
