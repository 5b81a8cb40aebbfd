//! Error taxonomy of a pipeline run.
//!
//! 每次运行的所有失败都归并为 [`PipelineError`]，由协调器转换为一次 `Failure`。

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTableError {
    #[error("table needs a header and a separator line, found {lines} line(s)")]
    TooFewLines { lines: usize },

    #[error("line 2 is not a table separator: {line:?}")]
    BadSeparator { line: String },

    #[error("table header has no columns")]
    NoColumns,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("converter executable not found: {program}")]
    MissingExecutable { program: String },

    #[error("converter timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("converter failed: {stderr}")]
    Failed { stderr: String },

    #[error("converter io error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectionError {
    #[error("could not focus target window: {0}")]
    Focus(String),

    #[error("clipboard write failed: {0}")]
    ClipboardWrite(String),

    #[error("paste keystroke failed: {0}")]
    Keystroke(String),

    #[error("host automation failed: {0}")]
    HostAutomation(String),

    #[error("could not open {path}: {reason}")]
    Open { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigReloadError {
    #[error("read config failed: {0}")]
    Read(String),

    #[error("parse config failed: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure of a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("clipboard is empty")]
    EmptyClipboard,

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("malformed table: {0}")]
    MalformedTable(#[from] MalformedTableError),

    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("cannot build payload: {0}")]
    Payload(String),

    #[error("no target application is running")]
    TargetUnavailable,

    #[error("injection failed: {0}")]
    Injection(#[from] InjectionError),

    #[error("config reload rejected: {0}")]
    ConfigReload(#[from] ConfigReloadError),
}

impl PipelineError {
    /// Stable short code, used in logs and notification titles.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::EmptyClipboard => "empty_clipboard",
            PipelineError::Clipboard(_) => "clipboard",
            PipelineError::MalformedTable(_) => "malformed_table",
            PipelineError::Conversion(_) => "conversion",
            PipelineError::Payload(_) => "payload",
            PipelineError::TargetUnavailable => "target_unavailable",
            PipelineError::Injection(_) => "injection",
            PipelineError::ConfigReload(_) => "config_reload",
        }
    }
}
