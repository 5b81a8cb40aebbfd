//! Process enumeration, foreground window lookup and focus.

mod focus;
mod foreground;
mod inspector;

pub use focus::NativeWindowFocus;
pub use inspector::SysinfoInspector;
