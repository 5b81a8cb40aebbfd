//! Port interfaces for the application layer
//!
//! Ports define the contract between the pipeline use cases and the
//! infrastructure/platform implementations. Blocking OS adapters are plain
//! `Send + Sync` traits; anything that spawns processes or touches the file
//! system asynchronously is an `async_trait`.

pub mod app_dirs;
pub mod artifacts;
pub mod clipboard;
mod clock;
pub mod converter;
pub mod errors;
pub mod host;
pub mod input;
pub mod notifier;
pub mod opener;
pub mod settings;
pub mod system;

pub use app_dirs::AppDirsPort;
pub use artifacts::ArtifactStorePort;
pub use clipboard::ClipboardPort;
pub use clock::*;
pub use converter::{ConversionRequest, DocumentConverterPort};
pub use errors::AppDirsError;
pub use host::DocumentHostPort;
pub use input::KeystrokePort;
pub use notifier::{Notification, NotificationPort};
pub use opener::FileOpenerPort;
pub use settings::SettingsPort;
pub use system::{SystemInspectorPort, WindowFocusPort};
