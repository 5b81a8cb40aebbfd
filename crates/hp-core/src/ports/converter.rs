use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ConversionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Converter executable.
    pub program: String,
    pub markdown: String,
    pub output: PathBuf,
    pub reference_template: Option<PathBuf>,
    pub timeout: Duration,
}

/// Markdown to `.docx` conversion through an external tool.
#[async_trait]
pub trait DocumentConverterPort: Send + Sync {
    /// Returns the path of the written document.
    async fn convert(&self, request: ConversionRequest) -> Result<PathBuf, ConversionError>;
}
