use super::model::{Settings, CURRENT_SCHEMA_VERSION};
use crate::target::InsertTarget;

pub const DEFAULT_HOTKEY: &str = "<ctrl>+b";
pub const DEFAULT_CONVERTER: &str = "pandoc";
pub const DEFAULT_SAVE_DIR: &str = "~/Documents/hotpaste";
pub const DEFAULT_CONVERTER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TRIGGER_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_PASTE_SETTLE_MS: u64 = 300;

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            hotkey: DEFAULT_HOTKEY.to_string(),
            converter_path: DEFAULT_CONVERTER.to_string(),
            reference_template: None,
            save_dir: DEFAULT_SAVE_DIR.to_string(),
            keep_generated_file: false,
            notify: true,
            enable_table_routing: true,
            preserve_table_styles: true,
            open_default_app_if_no_target: true,
            insert_target: InsertTarget::Auto,
            converter_timeout_secs: DEFAULT_CONVERTER_TIMEOUT_SECS,
            trigger_debounce_ms: DEFAULT_TRIGGER_DEBOUNCE_MS,
            paste_settle_ms: DEFAULT_PASTE_SETTLE_MS,
        }
    }
}
