use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use hp_core::hotkey::HotkeyBinding;
use rdev::{listen, Event, EventType};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, error, info};

use super::matcher::{map_key, ChordMatcher, Debouncer};

/// Zero-argument fire event; one per accepted hotkey press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub at_ms: i64,
}

/// Global keyboard hook on a dedicated OS thread.
///
/// The hook never swallows keys; the chord still reaches the focused app.
pub struct HotkeyListener;

impl HotkeyListener {
    /// Start listening for `binding`. Presses closer than `debounce` are
    /// dropped before they reach the receiver.
    pub fn spawn(
        binding: &HotkeyBinding,
        debounce: Duration,
    ) -> Result<UnboundedReceiver<TriggerEvent>> {
        let key = map_key(binding.key)
            .ok_or_else(|| anyhow!("key {} cannot be used as a global hotkey", binding.key))?;
        let mut matcher = ChordMatcher::new(binding, key);
        let mut debouncer = Debouncer::new(debounce);
        let (tx, rx) = unbounded_channel();
        let label = binding.to_string();

        std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                info!(hotkey = %label, "global hotkey registered");
                let result = listen(move |event: Event| match event.event_type {
                    EventType::KeyPress(k) => {
                        if !matcher.press(k) {
                            return;
                        }
                        if !debouncer.accept(Instant::now()) {
                            debug!("hotkey debounced");
                            return;
                        }
                        let pressed = TriggerEvent {
                            at_ms: chrono::Utc::now().timestamp_millis(),
                        };
                        if tx.send(pressed).is_err() {
                            debug!("hotkey receiver dropped");
                        }
                    }
                    EventType::KeyRelease(k) => matcher.release(k),
                    _ => {}
                });
                if let Err(err) = result {
                    error!(error = ?err, "global keyboard hook stopped");
                }
            })
            .context("spawn hotkey thread failed")?;

        Ok(rx)
    }
}
