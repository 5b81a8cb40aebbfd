//! Active configuration snapshot.
//!
//! Runs read an `Arc<Settings>` once at start, so a reload mid-run never
//! changes the behavior of that run.

use std::sync::{Arc, RwLock};

use hp_core::Settings;

pub struct SettingsStore {
    current: RwLock<Arc<Settings>>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        let guard = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in an already validated configuration.
    pub fn replace(&self, settings: Settings) -> Arc<Settings> {
        let next = Arc::new(settings);
        let mut guard = self.current.write().unwrap_or_else(|p| p.into_inner());
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_snapshot_survives_replace() {
        let store = SettingsStore::new(Settings::default());
        let before = store.current();

        store.replace(Settings {
            notify: false,
            ..Settings::default()
        });

        assert!(before.notify);
        assert!(!store.current().notify);
    }
}
