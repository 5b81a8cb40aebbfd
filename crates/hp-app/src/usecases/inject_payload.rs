//! Use case for delivering a payload into the target application
//! 将载荷投递到目标应用的用例

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hp_core::clipboard::ClipboardContents;
use hp_core::error::InjectionError;
use hp_core::ports::{
    ClipboardPort, DocumentHostPort, FileOpenerPort, KeystrokePort, WindowFocusPort,
};
use hp_core::target::HostFamily;
use hp_core::{AppHandle, ClipboardPayload, Payload, TargetApplication};
use tracing::{debug, info, info_span, warn, Instrument};

use super::blocking;

/// What happened to the clipboard contents saved before a paste.
///
/// Reported separately from the run outcome; a failed restore never fails
/// the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Payload did not go through the clipboard.
    NotApplicable,
    Restored,
    /// The clipboard was empty before, or could not be read.
    NothingToRestore,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionReport {
    pub message: String,
    pub restore: RestoreOutcome,
}

pub struct InjectPayload {
    clipboard: Arc<dyn ClipboardPort>,
    focus: Arc<dyn WindowFocusPort>,
    keystrokes: Arc<dyn KeystrokePort>,
    document_host: Arc<dyn DocumentHostPort>,
    opener: Arc<dyn FileOpenerPort>,
}

impl InjectPayload {
    pub fn new(
        clipboard: Arc<dyn ClipboardPort>,
        focus: Arc<dyn WindowFocusPort>,
        keystrokes: Arc<dyn KeystrokePort>,
        document_host: Arc<dyn DocumentHostPort>,
        opener: Arc<dyn FileOpenerPort>,
    ) -> Self {
        Self {
            clipboard,
            focus,
            keystrokes,
            document_host,
            opener,
        }
    }

    /// Deliver `payload` to `target`.
    ///
    /// `settle` is how long the host gets to read a pasted clipboard before
    /// the previous contents are put back.
    pub async fn execute(
        &self,
        payload: &Payload,
        target: &TargetApplication,
        settle: Duration,
    ) -> Result<InjectionReport, InjectionError> {
        let span = info_span!("usecase.inject_payload.execute");

        async {
            match payload {
                Payload::Clipboard(clip) => {
                    let handle = target.handle().ok_or_else(|| {
                        InjectionError::Focus("clipboard delivery needs a target window".into())
                    })?;
                    self.bring_to_front(handle).await?;
                    let restore = self.paste_via_clipboard(clip, settle).await?;
                    Ok(InjectionReport {
                        message: format!("pasted into {}", handle.family.display_name()),
                        restore,
                    })
                }
                Payload::InsertDocument { path, host } => {
                    if let Some(handle) = target.handle() {
                        self.bring_to_front(handle).await?;
                    }
                    self.insert_document(*host, path.clone()).await?;
                    Ok(InjectionReport {
                        message: format!("inserted into {}", host.display_name()),
                        restore: RestoreOutcome::NotApplicable,
                    })
                }
                Payload::OpenExternally { path } => {
                    self.open_externally(path.clone()).await?;
                    Ok(InjectionReport {
                        message: format!("opened externally: {}", path.display()),
                        restore: RestoreOutcome::NotApplicable,
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn bring_to_front(&self, handle: &AppHandle) -> Result<(), InjectionError> {
        let focus = Arc::clone(&self.focus);
        let handle = handle.clone();
        blocking(move || focus.bring_to_front(&handle))
            .await
            .map_err(InjectionError::Focus)
    }

    async fn paste_via_clipboard(
        &self,
        clip: &ClipboardPayload,
        settle: Duration,
    ) -> Result<RestoreOutcome, InjectionError> {
        let clipboard = Arc::clone(&self.clipboard);
        let saved = match blocking(move || clipboard.save_contents()).await {
            Ok(contents) => Some(contents),
            Err(err) => {
                warn!(error = %err, "could not save clipboard, it will not be restored");
                None
            }
        };

        let clipboard = Arc::clone(&self.clipboard);
        let payload = clip.clone();
        blocking(move || clipboard.write_payload(&payload))
            .await
            .map_err(InjectionError::ClipboardWrite)?;

        let keystrokes = Arc::clone(&self.keystrokes);
        let pasted = blocking(move || keystrokes.send_paste())
            .await
            .map_err(InjectionError::Keystroke);

        if pasted.is_ok() {
            tokio::time::sleep(settle).await;
        }
        let restore = self.restore(saved).await;
        pasted.map(|_| restore)
    }

    async fn restore(&self, saved: Option<ClipboardContents>) -> RestoreOutcome {
        let Some(contents) = saved.filter(|c| !c.is_empty()) else {
            return RestoreOutcome::NothingToRestore;
        };

        let clipboard = Arc::clone(&self.clipboard);
        match blocking(move || clipboard.restore(&contents)).await {
            Ok(()) => {
                debug!("previous clipboard contents restored");
                RestoreOutcome::Restored
            }
            Err(reason) => {
                warn!(error = %reason, "clipboard restore failed");
                RestoreOutcome::Failed(reason)
            }
        }
    }

    async fn insert_document(&self, host: HostFamily, path: PathBuf) -> Result<(), InjectionError> {
        info!(host = host.display_name(), path = %path.display(), "inserting document");
        self.document_host
            .insert_file(host, &path)
            .await
            .map_err(|e| InjectionError::HostAutomation(format!("{e:#}")))
    }

    async fn open_externally(&self, path: PathBuf) -> Result<(), InjectionError> {
        info!(path = %path.display(), "no target application, opening with default app");
        let opener = Arc::clone(&self.opener);
        let target = path.clone();
        blocking(move || opener.open(&target))
            .await
            .map_err(|reason| InjectionError::Open { path, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hp_core::target::MatchSource;

    mockall::mock! {
        pub Keystrokes {}

        impl KeystrokePort for Keystrokes {
            fn send_paste(&self) -> anyhow::Result<()>;
        }
    }

    mockall::mock! {
        pub Focus {}

        impl WindowFocusPort for Focus {
            fn bring_to_front(&self, handle: &AppHandle) -> anyhow::Result<()>;
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        initial: Option<String>,
        writes: Mutex<Vec<ClipboardPayload>>,
        restored: Mutex<Vec<ClipboardContents>>,
        fail_restore: bool,
    }

    impl ClipboardPort for RecordingClipboard {
        fn read_text(&self) -> anyhow::Result<Option<String>> {
            Ok(self.initial.clone())
        }

        fn save_contents(&self) -> anyhow::Result<ClipboardContents> {
            Ok(ClipboardContents {
                text: self.initial.clone(),
                ..Default::default()
            })
        }

        fn write_payload(&self, payload: &ClipboardPayload) -> anyhow::Result<()> {
            self.writes.lock().unwrap().push(payload.clone());
            Ok(())
        }

        fn restore(&self, contents: &ClipboardContents) -> anyhow::Result<()> {
            if self.fail_restore {
                anyhow::bail!("clipboard busy");
            }
            self.restored.lock().unwrap().push(contents.clone());
            Ok(())
        }
    }

    struct NoHost;

    #[async_trait]
    impl DocumentHostPort for NoHost {
        async fn insert_file(&self, _host: HostFamily, _path: &Path) -> anyhow::Result<()> {
            anyhow::bail!("automation unavailable")
        }
    }

    struct NoOpener;

    impl FileOpenerPort for NoOpener {
        fn open(&self, _path: &Path) -> anyhow::Result<()> {
            anyhow::bail!("no handler")
        }
    }

    fn excel() -> TargetApplication {
        TargetApplication::Spreadsheet(AppHandle {
            family: HostFamily::MsExcel,
            pid: 42,
            window_id: None,
            matched_by: MatchSource::FirstMatch,
        })
    }

    fn injector(
        clipboard: Arc<RecordingClipboard>,
        keystrokes: MockKeystrokes,
    ) -> InjectPayload {
        let mut focus = MockFocus::new();
        focus
            .expect_bring_to_front()
            .withf(|h| h.pid == 42)
            .times(1)
            .returning(|_| Ok(()));
        InjectPayload::new(
            clipboard,
            Arc::new(focus),
            Arc::new(keystrokes),
            Arc::new(NoHost),
            Arc::new(NoOpener),
        )
    }

    fn tsv_payload() -> Payload {
        Payload::Clipboard(ClipboardPayload {
            plain: "A\tB\r\n1\t2\r\n".into(),
            html: None,
        })
    }

    #[tokio::test]
    async fn clipboard_route_pastes_then_restores() {
        let clipboard = Arc::new(RecordingClipboard {
            initial: Some("previous".into()),
            ..Default::default()
        });
        let mut keys = MockKeystrokes::new();
        keys.expect_send_paste().times(1).returning(|| Ok(()));

        let report = injector(Arc::clone(&clipboard), keys)
            .execute(&tsv_payload(), &excel(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(report.message, "pasted into Excel");
        assert_eq!(report.restore, RestoreOutcome::Restored);
        assert_eq!(clipboard.writes.lock().unwrap().len(), 1);
        assert_eq!(
            clipboard.restored.lock().unwrap()[0].text.as_deref(),
            Some("previous")
        );
    }

    #[tokio::test]
    async fn restore_failure_does_not_fail_delivery() {
        let clipboard = Arc::new(RecordingClipboard {
            initial: Some("previous".into()),
            fail_restore: true,
            ..Default::default()
        });
        let mut keys = MockKeystrokes::new();
        keys.expect_send_paste().times(1).returning(|| Ok(()));

        let report = injector(clipboard, keys)
            .execute(&tsv_payload(), &excel(), Duration::ZERO)
            .await
            .unwrap();

        assert!(matches!(report.restore, RestoreOutcome::Failed(ref m) if m.contains("busy")));
    }

    #[tokio::test]
    async fn failed_keystroke_still_restores_clipboard() {
        let clipboard = Arc::new(RecordingClipboard {
            initial: Some("previous".into()),
            ..Default::default()
        });
        let mut keys = MockKeystrokes::new();
        keys.expect_send_paste()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("input blocked")));

        let err = injector(Arc::clone(&clipboard), keys)
            .execute(&tsv_payload(), &excel(), Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, InjectionError::Keystroke(_)));
        assert_eq!(clipboard.restored.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_previous_clipboard_has_nothing_to_restore() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let mut keys = MockKeystrokes::new();
        keys.expect_send_paste().returning(|| Ok(()));

        let report = injector(Arc::clone(&clipboard), keys)
            .execute(&tsv_payload(), &excel(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(report.restore, RestoreOutcome::NothingToRestore);
        assert!(clipboard.restored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn host_and_opener_errors_become_injection_errors() {
        let injector = InjectPayload::new(
            Arc::new(RecordingClipboard::default()),
            Arc::new(MockFocus::new()),
            Arc::new(MockKeystrokes::new()),
            Arc::new(NoHost),
            Arc::new(NoOpener),
        );

        let insert = Payload::InsertDocument {
            path: PathBuf::from("/tmp/x.docx"),
            host: HostFamily::MsWord,
        };
        let err = injector
            .execute(&insert, &TargetApplication::None, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, InjectionError::HostAutomation(_)));

        let open = Payload::OpenExternally {
            path: PathBuf::from("/tmp/x.csv"),
        };
        let err = injector
            .execute(&open, &TargetApplication::None, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, InjectionError::Open { .. }));
    }
}
