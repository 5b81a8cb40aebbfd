//! Config file hot reload.

mod watcher;

pub use watcher::{ConfigChanged, ConfigWatcher};
