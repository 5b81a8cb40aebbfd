//! Global hotkey binding.
//!
//! Accepts both `ctrl+shift+v` and the angle-bracket form `<ctrl>+b`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

impl Modifier {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "cmd" | "command" | "meta" | "super" | "win" => Some(Modifier::Meta),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Shift => "shift",
            Modifier::Meta => "meta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Lowercase ASCII letter or digit.
    Char(char),
    /// F1 to F12.
    Function(u8),
    Space,
    Enter,
    Tab,
    Escape,
    Insert,
}

impl Key {
    fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return c.is_ascii_alphanumeric().then_some(Key::Char(c));
        }
        match token {
            "space" => Some(Key::Space),
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "esc" | "escape" => Some(Key::Escape),
            "insert" | "ins" => Some(Key::Insert),
            _ => token
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
                .map(Key::Function),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Function(n) => write!(f, "f{n}"),
            Key::Space => write!(f, "space"),
            Key::Enter => write!(f, "enter"),
            Key::Tab => write!(f, "tab"),
            Key::Escape => write!(f, "esc"),
            Key::Insert => write!(f, "insert"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyParseError {
    #[error("hotkey is empty")]
    Empty,

    #[error("unknown key {0:?}")]
    UnknownKey(String),

    #[error("hotkey {0:?} has no main key")]
    MissingKey(String),

    #[error("hotkey {0:?} has more than one main key")]
    MultipleKeys(String),

    #[error("hotkey {0:?} needs at least one modifier")]
    NoModifier(String),
}

/// A parsed chord: one or more modifiers plus exactly one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub modifiers: BTreeSet<Modifier>,
    pub key: Key,
}

impl HotkeyBinding {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

impl FromStr for HotkeyBinding {
    type Err = HotkeyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut modifiers = BTreeSet::new();
        let mut key = None;

        for token in normalized.split('+') {
            let token = token.trim().trim_start_matches('<').trim_end_matches('>');
            if let Some(modifier) = Modifier::parse(token) {
                modifiers.insert(modifier);
                continue;
            }
            let parsed =
                Key::parse(token).ok_or_else(|| HotkeyParseError::UnknownKey(token.to_string()))?;
            if key.replace(parsed).is_some() {
                return Err(HotkeyParseError::MultipleKeys(raw.to_string()));
            }
        }

        let key = key.ok_or_else(|| HotkeyParseError::MissingKey(raw.to_string()))?;
        if modifiers.is_empty() {
            return Err(HotkeyParseError::NoModifier(raw.to_string()));
        }

        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}
