//! Global hotkey hook.
//! 全局热键监听

mod listener;
mod matcher;

pub use listener::{HotkeyListener, TriggerEvent};
pub use matcher::{map_key, ChordMatcher, Debouncer};
