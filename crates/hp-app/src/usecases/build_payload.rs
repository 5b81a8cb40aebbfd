//! Use case for turning a conversion artifact into a deliverable payload
//! 根据目标应用构造投递载荷的用例

use std::sync::Arc;

use hp_core::error::PipelineError;
use hp_core::ports::ArtifactStorePort;
use hp_core::table::{render_csv, render_html, render_tsv, RenderError};
use hp_core::{
    ClipboardPayload, ConversionArtifact, Payload, Settings, TableModel, TargetApplication,
};
use tracing::{debug, info_span, Instrument};

/// Builds the payload for the resolved target.
///
/// ## Behavior / 行为
/// - Word processor + document: insert the file
/// - Word processor + table: TSV plus an HTML table
/// - Spreadsheet + table: TSV, plus HTML when styles are preserved
/// - No target: write into the save directory and open externally, or
///   `TargetUnavailable` when that fallback is off
pub struct BuildPayload {
    artifacts: Arc<dyn ArtifactStorePort>,
}

fn render_err(err: RenderError) -> PipelineError {
    PipelineError::Payload(err.to_string())
}

impl BuildPayload {
    pub fn new(artifacts: Arc<dyn ArtifactStorePort>) -> Self {
        Self { artifacts }
    }

    pub async fn execute(
        &self,
        artifact: &ConversionArtifact,
        target: &TargetApplication,
        settings: &Settings,
    ) -> Result<Payload, PipelineError> {
        let span = info_span!("usecase.build_payload.execute");

        async {
            let payload = match (artifact, target) {
                (_, TargetApplication::None) if !settings.open_default_app_if_no_target => {
                    return Err(PipelineError::TargetUnavailable);
                }
                (ConversionArtifact::Document(doc), TargetApplication::None) => {
                    let path = self
                        .artifacts
                        .publish_document(doc, &settings.save_dir)
                        .await
                        .map_err(|e| PipelineError::Payload(format!("{e:#}")))?;
                    Payload::OpenExternally { path }
                }
                (ConversionArtifact::Table(table), TargetApplication::None) => {
                    let bytes = render_csv(table).map_err(render_err)?;
                    let path = self
                        .artifacts
                        .write_table(&settings.save_dir, "csv", &bytes)
                        .await
                        .map_err(|e| PipelineError::Payload(format!("{e:#}")))?;
                    Payload::OpenExternally { path }
                }
                (ConversionArtifact::Document(doc), TargetApplication::WordProcessor(handle)) => {
                    Payload::InsertDocument {
                        path: doc.path.clone(),
                        host: handle.family,
                    }
                }
                (ConversionArtifact::Table(table), TargetApplication::WordProcessor(_)) => {
                    Payload::Clipboard(table_payload(table, true, settings.preserve_table_styles)?)
                }
                (ConversionArtifact::Table(table), TargetApplication::Spreadsheet(_)) => {
                    Payload::Clipboard(table_payload(
                        table,
                        settings.preserve_table_styles,
                        settings.preserve_table_styles,
                    )?)
                }
                (ConversionArtifact::Document(_), TargetApplication::Spreadsheet(_)) => {
                    return Err(PipelineError::Payload(
                        "a converted document cannot be pasted into a spreadsheet".into(),
                    ));
                }
            };

            debug!(payload = payload_kind(&payload), "payload built");
            Ok(payload)
        }
        .instrument(span)
        .await
    }
}

fn table_payload(
    table: &TableModel,
    with_html: bool,
    styled: bool,
) -> Result<ClipboardPayload, PipelineError> {
    let plain = render_tsv(table).map_err(render_err)?;
    let html = if with_html {
        Some(render_html(table, styled).map_err(render_err)?)
    } else {
        None
    };
    Ok(ClipboardPayload { plain, html })
}

fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::InsertDocument { .. } => "insert_document",
        Payload::Clipboard(_) => "clipboard",
        Payload::OpenExternally { .. } => "open_externally",
    }
}
