use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Key events
// =============================================================================

/// Whether a key went down or came back up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Down,
    Up,
}

/// A single global keyboard event as delivered by the event source.
///
/// `name` is either the character the key produces (`"a"`, `"Õ"`) or the
/// name of a control key (`"space"`, `"backspace"`, `"enter"`, `"esc"`,
/// `"shift"`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    pub name: String,
    pub action: KeyAction,
}

impl KeyEvent {
    /// A key press.
    pub fn down(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: KeyAction::Down,
        }
    }

    /// A key release.
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: KeyAction::Up,
        }
    }

    pub fn is_press(&self) -> bool {
        self.action == KeyAction::Down
    }

    /// Classify the key name.
    pub fn key(&self) -> Key {
        Key::from_name(&self.name)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            KeyAction::Down => write!(f, "{} down", self.name),
            KeyAction::Up => write!(f, "{} up", self.name),
        }
    }
}

/// Classified key identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key that produces exactly one character.
    Char(char),
    Space,
    Enter,
    Backspace,
    Esc,
    /// Any other multi-character key name (modifiers, arrows, F-keys, ...).
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Key::Char(c);
        }
        match name {
            "space" => Key::Space,
            "enter" => Key::Enter,
            "backspace" => Key::Backspace,
            "esc" => Key::Esc,
            other => Key::Other(other.to_string()),
        }
    }
}

// =============================================================================
// Handling outcome
// =============================================================================

/// What the event source must do with the event it just delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Let the key reach the focused application unchanged.
    Pass,
    /// Swallow the key; its effect (if any) has already been injected.
    Suppress,
    /// Unhook and end the session.
    Terminate,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Pass => write!(f, "Pass"),
            Disposition::Suppress => write!(f, "Suppress"),
            Disposition::Terminate => write!(f, "Terminate"),
        }
    }
}
