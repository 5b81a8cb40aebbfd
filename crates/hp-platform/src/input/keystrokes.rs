use anyhow::{anyhow, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use hp_core::ports::KeystrokePort;
use tracing::debug;

#[cfg(target_os = "macos")]
const PASTE_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const PASTE_MODIFIER: Key = Key::Control;

/// Simulated paste chord via enigo.
///
/// A fresh `Enigo` is created per call; the connection is not `Send` on
/// every platform.
#[derive(Default)]
pub struct EnigoKeystrokes;

impl EnigoKeystrokes {
    pub fn new() -> Self {
        Self
    }
}

impl KeystrokePort for EnigoKeystrokes {
    fn send_paste(&self) -> Result<()> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| anyhow!("init enigo failed: {e}"))?;

        enigo
            .key(PASTE_MODIFIER, Direction::Press)
            .map_err(|e| anyhow!("press modifier failed: {e}"))?;
        let clicked = enigo.key(Key::Unicode('v'), Direction::Click);
        // always release the modifier, even if the click failed
        let released = enigo.key(PASTE_MODIFIER, Direction::Release);

        clicked.map_err(|e| anyhow!("press V failed: {e}"))?;
        released.map_err(|e| anyhow!("release modifier failed: {e}"))?;
        debug!("paste chord sent");
        Ok(())
    }
}
