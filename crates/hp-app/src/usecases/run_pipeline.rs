//! Pipeline coordinator
//! 流水线协调器：每次热键触发执行一次完整运行
//!
//! At most one run is in flight. A trigger that arrives while a run is busy
//! is dropped on the floor: no clipboard read, no file, no notification.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use hp_core::content::{classify, ContentKind};
use hp_core::error::PipelineError;
use hp_core::pipeline::{PipelineEvent, PipelineStage, PipelineStateMachine, SkipReason};
use hp_core::ports::{
    ArtifactStorePort, ClipboardPort, ClockPort, Notification, NotificationPort,
    SystemInspectorPort,
};
use hp_core::table::transpile;
use hp_core::target::{resolve_target, ResolveInput};
use hp_core::{
    ClipboardSnapshot, ConversionArtifact, GeneratedDocument, PipelineResult, Settings,
    SystemSnapshot, TargetApplication,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::{
    blocking, BuildPayload, ConvertMarkdown, InjectPayload, RestoreOutcome,
};
use crate::deps::PipelineDeps;
use crate::settings_store::SettingsStore;

/// Everything a finished (or skipped) run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub result: PipelineResult,
    pub kind: Option<ContentKind>,
    pub target: Option<TargetApplication>,
    pub restore: RestoreOutcome,
}

impl RunReport {
    fn busy() -> Self {
        Self {
            result: PipelineResult::Skipped(SkipReason::Busy),
            kind: None,
            target: None,
            restore: RestoreOutcome::NotApplicable,
        }
    }
}

/// Why a run stopped before delivery.
enum Halt {
    Skip(SkipReason),
    Fail(PipelineError),
}

/// An empty clipboard is a skip, every other error a failure.
impl From<PipelineError> for Halt {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyClipboard => Halt::Skip(SkipReason::EmptyClipboard),
            err => Halt::Fail(err),
        }
    }
}

#[derive(Default)]
struct RunContext {
    kind: Option<ContentKind>,
    target: Option<TargetApplication>,
    restore: Option<RestoreOutcome>,
    /// Temp document to delete once the run is over.
    cleanup: Option<PathBuf>,
}

/// Puts the stage back to `Idle` if a run unwinds without reporting.
struct StageReset<'a>(&'a Mutex<PipelineStage>);

impl Drop for StageReset<'_> {
    fn drop(&mut self) {
        let mut stage = self.0.lock().unwrap_or_else(|p| p.into_inner());
        if *stage != PipelineStage::Idle {
            *stage = PipelineStage::Idle;
        }
    }
}

pub struct PipelineCoordinator {
    clipboard: Arc<dyn ClipboardPort>,
    clock: Arc<dyn ClockPort>,
    inspector: Arc<dyn SystemInspectorPort>,
    artifacts: Arc<dyn ArtifactStorePort>,
    notifier: Arc<dyn NotificationPort>,
    convert: ConvertMarkdown,
    build: BuildPayload,
    inject: InjectPayload,
    settings: Arc<SettingsStore>,
    stage: Mutex<PipelineStage>,
}

impl PipelineCoordinator {
    pub fn new(deps: PipelineDeps, settings: Arc<SettingsStore>) -> Self {
        Self {
            convert: ConvertMarkdown::new(deps.converter, Arc::clone(&deps.artifacts)),
            build: BuildPayload::new(Arc::clone(&deps.artifacts)),
            inject: InjectPayload::new(
                Arc::clone(&deps.clipboard),
                deps.focus,
                deps.keystrokes,
                deps.document_host,
                deps.opener,
            ),
            clipboard: deps.clipboard,
            clock: deps.clock,
            inspector: deps.inspector,
            artifacts: deps.artifacts,
            notifier: deps.notifier,
            settings,
            stage: Mutex::new(PipelineStage::Idle),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        *self.stage.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn is_busy(&self) -> bool {
        PipelineStateMachine::is_busy(self.stage())
    }

    /// Start a run on a worker task without waiting for it.
    ///
    /// Returns `None` when a run is already in flight; the trigger is ignored.
    pub fn fire(self: &Arc<Self>) -> Option<JoinHandle<RunReport>> {
        if !self.try_begin() {
            info!("pipeline busy, ignoring trigger");
            return None;
        }
        let this = Arc::clone(self);
        Some(tokio::spawn(async move { this.run_claimed().await }))
    }

    /// Run the pipeline to completion on the current task.
    pub async fn run_once(&self) -> RunReport {
        if !self.try_begin() {
            info!("pipeline busy, ignoring trigger");
            return RunReport::busy();
        }
        self.run_claimed().await
    }

    fn try_begin(&self) -> bool {
        let mut stage = self.stage.lock().unwrap_or_else(|p| p.into_inner());
        match PipelineStateMachine::transition(*stage, PipelineEvent::Trigger) {
            Some(next) => {
                *stage = next;
                true
            }
            None => false,
        }
    }

    fn advance(&self, event: PipelineEvent) {
        let mut stage = self.stage.lock().unwrap_or_else(|p| p.into_inner());
        match PipelineStateMachine::transition(*stage, event) {
            Some(next) => {
                debug!(from = ?*stage, to = ?next, "pipeline stage");
                *stage = next;
            }
            None => error!(stage = ?*stage, event = ?event, "invalid pipeline transition"),
        }
    }

    async fn run_claimed(&self) -> RunReport {
        let _reset = StageReset(&self.stage);
        let settings = self.settings.current();
        let span = info_span!("pipeline.run");

        async {
            let started = Instant::now();
            let mut ctx = RunContext::default();
            let outcome = self.run_stages(&settings, &mut ctx).await;

            if let Some(path) = ctx.cleanup.take() {
                if let Err(err) = self.artifacts.discard(&path).await {
                    warn!(path = %path.display(), error = %err, "failed to remove temp document");
                }
            }

            let result = match outcome {
                Ok(message) => {
                    self.advance(PipelineEvent::StepDone);
                    PipelineResult::Success(message)
                }
                Err(Halt::Skip(reason)) => {
                    self.advance(PipelineEvent::Skip);
                    PipelineResult::Skipped(reason)
                }
                Err(Halt::Fail(err)) => {
                    self.advance(PipelineEvent::StepFailed);
                    PipelineResult::Failure(err)
                }
            };

            self.report(&result, &settings);
            self.advance(PipelineEvent::Reported);
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "pipeline run finished");

            RunReport {
                result,
                kind: ctx.kind,
                target: ctx.target,
                restore: ctx.restore.unwrap_or(RestoreOutcome::NotApplicable),
            }
        }
        .instrument(span)
        .await
    }

    async fn run_stages(&self, settings: &Settings, ctx: &mut RunContext) -> Result<String, Halt> {
        // Classifying
        let snapshot = self.snapshot_clipboard().await?;
        if snapshot.is_blank() {
            return Err(PipelineError::EmptyClipboard.into());
        }
        let kind = classify(&snapshot.text, settings.enable_table_routing);
        info!(?kind, chars = snapshot.text.len(), "clipboard classified");
        ctx.kind = Some(kind);
        self.advance(PipelineEvent::StepDone);

        // Converting
        let artifact = match kind {
            ContentKind::PlainMarkdown => {
                let doc = self.convert.execute(&snapshot.text, settings).await?;
                if !doc.retained {
                    ctx.cleanup = Some(doc.path.clone());
                }
                ConversionArtifact::Document(doc)
            }
            ContentKind::MarkdownTable => {
                let table = transpile(&snapshot.text).map_err(PipelineError::from)?;
                debug!(
                    columns = table.column_count(),
                    rows = table.row_count(),
                    "table parsed"
                );
                ConversionArtifact::Table(table)
            }
        };
        self.advance(PipelineEvent::StepDone);

        // Resolving
        let system = self.inspect_system().await;
        let target = resolve_target(ResolveInput {
            snapshot: &system,
            kind,
            table_routing: settings.enable_table_routing,
            insert_target: settings.insert_target,
        });
        info!(?target, "target resolved");
        ctx.target = Some(target.clone());
        self.advance(PipelineEvent::StepDone);

        // BuildingPayload
        let payload = self.build.execute(&artifact, &target, settings).await?;
        self.advance(PipelineEvent::StepDone);

        // Injecting
        let report = match self
            .inject
            .execute(&payload, &target, settings.paste_settle())
            .await
        {
            Ok(report) => report,
            Err(err) => {
                if let ConversionArtifact::Document(doc) = &artifact {
                    self.keep_for_recovery(doc, settings, ctx).await;
                }
                return Err(PipelineError::from(err).into());
            }
        };
        ctx.restore = Some(report.restore);
        Ok(report.message)
    }

    /// A document the host refused is copied into `save_dir` so it can still
    /// be opened by hand. If the copy fails the temp file is left in place.
    async fn keep_for_recovery(
        &self,
        doc: &GeneratedDocument,
        settings: &Settings,
        ctx: &mut RunContext,
    ) {
        match self.artifacts.publish_document(doc, &settings.save_dir).await {
            Ok(path) => warn!(path = %path.display(), "insertion failed, document kept"),
            Err(err) => {
                ctx.cleanup = None;
                warn!(
                    path = %doc.path.display(),
                    error = %err,
                    "insertion failed, temp document left in place"
                );
            }
        }
    }

    async fn snapshot_clipboard(&self) -> Result<ClipboardSnapshot, PipelineError> {
        let clipboard = Arc::clone(&self.clipboard);
        let text = blocking(move || clipboard.read_text())
            .await
            .map_err(PipelineError::Clipboard)?;
        Ok(ClipboardSnapshot::new(
            text.unwrap_or_default(),
            self.clock.now_ms(),
        ))
    }

    async fn inspect_system(&self) -> SystemSnapshot {
        let inspector = Arc::clone(&self.inspector);
        match blocking(move || inspector.snapshot()).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "system inspection failed, assuming no target");
                SystemSnapshot::default()
            }
        }
    }

    fn report(&self, result: &PipelineResult, settings: &Settings) {
        let title = match result {
            PipelineResult::Success(msg) => {
                info!(message = %msg, "pipeline succeeded");
                "hotpaste"
            }
            PipelineResult::Failure(err) => {
                warn!(code = err.code(), error = %err, "pipeline failed");
                "hotpaste: failed"
            }
            PipelineResult::Skipped(reason) => {
                info!(%reason, "pipeline skipped");
                "hotpaste: skipped"
            }
        };

        self.notifier.notify(&Notification {
            title: title.to_string(),
            body: result.message(),
            result: result.clone(),
            show_desktop: settings.notify,
        });
    }
}
