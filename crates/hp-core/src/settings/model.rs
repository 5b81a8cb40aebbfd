use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigReloadError;
use crate::hotkey::HotkeyBinding;
use crate::target::InsertTarget;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// User configuration, stored as TOML.
///
/// Every field has a default, so a partial file is valid.
///
/// 用户配置；缺失字段使用默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: u32,

    /// Global trigger chord, e.g. `<ctrl>+b` or `ctrl+shift+v`.
    pub hotkey: String,

    /// Document converter executable (name on PATH or absolute path).
    pub converter_path: String,

    /// Optional `.docx` whose styles the converter applies.
    pub reference_template: Option<String>,

    /// Where retained documents and fallback files are written. `~` and
    /// environment variables are expanded.
    pub save_dir: String,

    pub keep_generated_file: bool,
    pub notify: bool,
    pub enable_table_routing: bool,
    pub preserve_table_styles: bool,
    pub open_default_app_if_no_target: bool,

    /// Restricts which word processor receives documents: `auto`, `word`,
    /// `wps` or `none` (never insert).
    pub insert_target: InsertTarget,

    pub converter_timeout_secs: u64,

    /// Minimum gap between two accepted hotkey presses.
    pub trigger_debounce_ms: u64,

    /// How long the host gets to consume a paste before the clipboard is restored.
    pub paste_settle_ms: u64,
}

impl Settings {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigReloadError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| ConfigReloadError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigReloadError> {
        self.hotkey_binding()?;
        if self.converter_path.trim().is_empty() {
            return Err(ConfigReloadError::Invalid("converter_path is empty".into()));
        }
        if self.save_dir.trim().is_empty() {
            return Err(ConfigReloadError::Invalid("save_dir is empty".into()));
        }
        if self.converter_timeout_secs == 0 {
            return Err(ConfigReloadError::Invalid(
                "converter_timeout_secs must be positive".into(),
            ));
        }
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(ConfigReloadError::Invalid(format!(
                "schema_version {} is newer than supported {}",
                self.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }

    pub fn hotkey_binding(&self) -> Result<HotkeyBinding, ConfigReloadError> {
        self.hotkey
            .parse()
            .map_err(|e| ConfigReloadError::Invalid(format!("hotkey: {e}")))
    }

    pub fn converter_timeout(&self) -> Duration {
        Duration::from_secs(self.converter_timeout_secs)
    }

    pub fn trigger_debounce(&self) -> Duration {
        Duration::from_millis(self.trigger_debounce_ms)
    }

    pub fn paste_settle(&self) -> Duration {
        Duration::from_millis(self.paste_settle_ms)
    }
}
