//! Core domain for hotpaste.
//!
//! Everything in this crate is pure: classification, table parsing, target
//! resolution and the pipeline state machine are plain functions over values.
//! Side effects live behind the traits in [`ports`].

pub mod app_dirs;
pub mod clipboard;
pub mod content;
pub mod error;
pub mod hotkey;
pub mod pipeline;
pub mod ports;
pub mod settings;
pub mod table;
pub mod target;

pub use clipboard::{ClipboardContents, ClipboardPayload, ClipboardSnapshot};
pub use content::{classify, ContentKind};
pub use error::PipelineError;
pub use hotkey::HotkeyBinding;
pub use pipeline::{ConversionArtifact, GeneratedDocument, Payload, PipelineResult};
pub use settings::model::Settings;
pub use table::TableModel;
pub use target::{AppHandle, HostFamily, SystemSnapshot, TargetApplication};
