//! Per-run pipeline values and the stage state machine.

pub mod state_machine;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::clipboard::ClipboardPayload;
use crate::error::PipelineError;
use crate::table::TableModel;
use crate::target::HostFamily;

pub use state_machine::{PipelineEvent, PipelineStage, PipelineStateMachine};

/// A converted document on disk.
///
/// `retained` documents live in the save directory and are never cleaned up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub path: PathBuf,
    pub retained: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionArtifact {
    Document(GeneratedDocument),
    Table(TableModel),
}

/// What the injector delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Ask the host to insert the file at the cursor.
    InsertDocument { path: PathBuf, host: HostFamily },
    /// Write to the clipboard and simulate paste.
    Clipboard(ClipboardPayload),
    /// No target: hand the file to the OS default application.
    OpenExternally { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Another run is in flight.
    Busy,
    /// Clipboard text is empty or whitespace.
    EmptyClipboard,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Busy => write!(f, "busy, ignoring trigger"),
            SkipReason::EmptyClipboard => write!(f, "{}", PipelineError::EmptyClipboard),
        }
    }
}

/// Outcome of exactly one run, handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Success(String),
    Failure(PipelineError),
    Skipped(SkipReason),
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success(_))
    }

    /// One-line summary for notifications and logs.
    pub fn message(&self) -> String {
        match self {
            PipelineResult::Success(msg) => msg.clone(),
            PipelineResult::Failure(err) => err.to_string(),
            PipelineResult::Skipped(reason) => reason.to_string(),
        }
    }
}
