use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use hp_core::hotkey::{HotkeyBinding, Key, Modifier};
use rdev::Key as RawKey;

/// Translate a configured main key into the hook's key code.
///
/// Returns `None` for keys the hook cannot see (F13 and up).
pub fn map_key(key: Key) -> Option<RawKey> {
    let raw = match key {
        Key::Char(c) => match c {
            'a' => RawKey::KeyA,
            'b' => RawKey::KeyB,
            'c' => RawKey::KeyC,
            'd' => RawKey::KeyD,
            'e' => RawKey::KeyE,
            'f' => RawKey::KeyF,
            'g' => RawKey::KeyG,
            'h' => RawKey::KeyH,
            'i' => RawKey::KeyI,
            'j' => RawKey::KeyJ,
            'k' => RawKey::KeyK,
            'l' => RawKey::KeyL,
            'm' => RawKey::KeyM,
            'n' => RawKey::KeyN,
            'o' => RawKey::KeyO,
            'p' => RawKey::KeyP,
            'q' => RawKey::KeyQ,
            'r' => RawKey::KeyR,
            's' => RawKey::KeyS,
            't' => RawKey::KeyT,
            'u' => RawKey::KeyU,
            'v' => RawKey::KeyV,
            'w' => RawKey::KeyW,
            'x' => RawKey::KeyX,
            'y' => RawKey::KeyY,
            'z' => RawKey::KeyZ,
            '0' => RawKey::Num0,
            '1' => RawKey::Num1,
            '2' => RawKey::Num2,
            '3' => RawKey::Num3,
            '4' => RawKey::Num4,
            '5' => RawKey::Num5,
            '6' => RawKey::Num6,
            '7' => RawKey::Num7,
            '8' => RawKey::Num8,
            '9' => RawKey::Num9,
            _ => return None,
        },
        Key::Function(n) => match n {
            1 => RawKey::F1,
            2 => RawKey::F2,
            3 => RawKey::F3,
            4 => RawKey::F4,
            5 => RawKey::F5,
            6 => RawKey::F6,
            7 => RawKey::F7,
            8 => RawKey::F8,
            9 => RawKey::F9,
            10 => RawKey::F10,
            11 => RawKey::F11,
            12 => RawKey::F12,
            _ => return None,
        },
        Key::Space => RawKey::Space,
        Key::Enter => RawKey::Return,
        Key::Tab => RawKey::Tab,
        Key::Escape => RawKey::Escape,
        Key::Insert => RawKey::Insert,
    };
    Some(raw)
}

fn modifier_of(key: RawKey) -> Option<Modifier> {
    match key {
        RawKey::ControlLeft | RawKey::ControlRight => Some(Modifier::Ctrl),
        RawKey::Alt | RawKey::AltGr => Some(Modifier::Alt),
        RawKey::ShiftLeft | RawKey::ShiftRight => Some(Modifier::Shift),
        RawKey::MetaLeft | RawKey::MetaRight => Some(Modifier::Meta),
        _ => None,
    }
}

/// Tracks held modifiers and reports when the configured chord goes down.
///
/// Modifiers must match exactly, so `ctrl+b` does not fire on `ctrl+shift+b`.
/// Holding the main key (auto-repeat) fires once.
pub struct ChordMatcher {
    modifiers: BTreeSet<Modifier>,
    key: RawKey,
    // Left and right variants are counted separately.
    held: Vec<RawKey>,
    key_down: bool,
}

impl ChordMatcher {
    pub fn new(binding: &HotkeyBinding, key: RawKey) -> Self {
        Self {
            modifiers: binding.modifiers.clone(),
            key,
            held: Vec::new(),
            key_down: false,
        }
    }

    fn held_modifiers(&self) -> BTreeSet<Modifier> {
        self.held.iter().filter_map(|k| modifier_of(*k)).collect()
    }

    /// Returns true when this press completes the chord.
    pub fn press(&mut self, key: RawKey) -> bool {
        if modifier_of(key).is_some() {
            if !self.held.contains(&key) {
                self.held.push(key);
            }
            return false;
        }
        if key != self.key {
            return false;
        }
        if self.key_down {
            return false;
        }
        self.key_down = true;
        self.held_modifiers() == self.modifiers
    }

    pub fn release(&mut self, key: RawKey) {
        if key == self.key {
            self.key_down = false;
        }
        self.held.retain(|k| *k != key);
    }
}

/// Drops triggers closer together than `window`.
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}
