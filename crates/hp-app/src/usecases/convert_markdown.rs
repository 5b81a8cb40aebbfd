//! Use case for converting Markdown into a `.docx`
//! 将 Markdown 转换为 docx 文档的用例

use std::sync::Arc;

use hp_core::content::math::normalize_math_delimiters;
use hp_core::error::{ConversionError, PipelineError};
use hp_core::ports::{ArtifactStorePort, ConversionRequest, DocumentConverterPort};
use hp_core::{GeneratedDocument, Settings};
use tracing::{debug, info_span, warn, Instrument};

pub struct ConvertMarkdown {
    converter: Arc<dyn DocumentConverterPort>,
    artifacts: Arc<dyn ArtifactStorePort>,
}

impl ConvertMarkdown {
    pub fn new(
        converter: Arc<dyn DocumentConverterPort>,
        artifacts: Arc<dyn ArtifactStorePort>,
    ) -> Self {
        Self {
            converter,
            artifacts,
        }
    }

    /// Convert `markdown` with the converter configured in `settings`.
    ///
    /// A failed conversion leaves no file behind, including in `save_dir`
    /// when the document was meant to be retained.
    pub async fn execute(
        &self,
        markdown: &str,
        settings: &Settings,
    ) -> Result<GeneratedDocument, PipelineError> {
        let span = info_span!(
            "usecase.convert_markdown.execute",
            converter = %settings.converter_path,
            retain = settings.keep_generated_file,
        );

        async {
            let doc = self
                .artifacts
                .allocate_document(&settings.save_dir, settings.keep_generated_file)
                .await
                .map_err(|e| ConversionError::Io(format!("{e:#}")))?;

            let reference_template = match &settings.reference_template {
                Some(raw) => Some(
                    self.artifacts
                        .resolve_dir(raw)
                        .map_err(|e| ConversionError::Io(format!("{e:#}")))?,
                ),
                None => None,
            };

            let request = ConversionRequest {
                program: settings.converter_path.clone(),
                markdown: normalize_math_delimiters(markdown),
                output: doc.path.clone(),
                reference_template,
                timeout: settings.converter_timeout(),
            };

            match self.converter.convert(request).await {
                Ok(path) => {
                    debug!(path = %path.display(), "markdown converted");
                    Ok(GeneratedDocument {
                        path,
                        retained: doc.retained,
                    })
                }
                Err(err) => {
                    if let Err(cleanup) = self.artifacts.discard(&doc.path).await {
                        warn!(error = %cleanup, "failed to remove partial output");
                    }
                    Err(PipelineError::Conversion(err))
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;
    use hp_infra::fs::FsArtifactStore;

    /// Writes half a document, then reports failure.
    struct PartialConverter;

    #[async_trait]
    impl DocumentConverterPort for PartialConverter {
        async fn convert(&self, request: ConversionRequest) -> Result<PathBuf, ConversionError> {
            tokio::fs::write(&request.output, b"PK-partial")
                .await
                .map_err(|e| ConversionError::Io(e.to_string()))?;
            Err(ConversionError::Failed {
                stderr: "pandoc: out of memory".into(),
            })
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    async fn run_failing(retain: bool) -> (tempfile::TempDir, PathBuf, PathBuf, PipelineError) {
        let root = tempfile::tempdir().unwrap();
        let temp_dir = root.path().join("tmp");
        let save_dir = root.path().join("saved");
        let usecase = ConvertMarkdown::new(
            Arc::new(PartialConverter),
            Arc::new(FsArtifactStore::with_temp_dir(temp_dir.clone())),
        );
        let settings = Settings {
            save_dir: save_dir.to_string_lossy().into_owned(),
            keep_generated_file: retain,
            ..Settings::default()
        };

        let err = usecase.execute("# Title", &settings).await.unwrap_err();
        (root, temp_dir, save_dir, err)
    }

    #[tokio::test]
    async fn failed_conversion_removes_partial_temp_output() {
        let (_root, temp_dir, _save_dir, err) = run_failing(false).await;

        assert!(matches!(err, PipelineError::Conversion(ConversionError::Failed { .. })));
        assert_eq!(entries(&temp_dir), 0);
    }

    #[tokio::test]
    async fn failed_conversion_removes_partial_output_even_when_retained() {
        let (_root, _temp_dir, save_dir, err) = run_failing(true).await;

        assert!(matches!(err, PipelineError::Conversion(_)));
        assert_eq!(entries(&save_dir), 0);
    }
}
