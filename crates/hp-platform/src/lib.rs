//! # hp-platform
//!
//! Operating-system adapters for hotpaste: clipboard, process and window
//! inspection, keystroke injection, office automation, the global hotkey
//! hook, desktop notifications and the single-instance lock.

pub mod app_dirs;
pub mod clipboard;
pub mod host;
pub mod hotkey;
pub mod input;
pub mod instance;
pub mod notify;
pub mod opener;
pub mod system;
