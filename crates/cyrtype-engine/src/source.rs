//! Global keyboard event delivery.
//!
//! [`EventSource`] hands every key event to a handler and honours the
//! returned [`Disposition`]. On Windows [`KeyHook`] grabs the system-wide
//! keyboard through `rdev`, so suppressed keys never reach the focused
//! application. On other platforms it returns an error. [`ScriptedSource`]
//! replays a fixed list of events.

use std::collections::VecDeque;

use cyrtype_core::error::Result;
use cyrtype_core::types::{Disposition, KeyEvent};

use crate::sink::InjectionGuard;

/// Callback invoked for every delivered event.
pub type EventHandler = Box<dyn FnMut(&KeyEvent) -> Disposition + Send>;

/// Producer of key events.
pub trait EventSource {
    /// Deliver events to `handler` until the source is exhausted or the
    /// handler returns [`Disposition::Terminate`].
    fn run(&mut self, handler: EventHandler) -> Result<()>;
}

/// Replays a fixed sequence of events.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pending: VecDeque<KeyEvent>,
    delivered: Vec<(KeyEvent, Disposition)>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            pending: events.into_iter().collect(),
            delivered: Vec::new(),
        }
    }

    /// Press and release for every key name, in order.
    pub fn typing<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            keys.into_iter()
                .flat_map(|k| [KeyEvent::down(k), KeyEvent::up(k)]),
        )
    }

    /// Events handed to the handler, with the answer for each.
    pub fn delivered(&self) -> &[(KeyEvent, Disposition)] {
        &self.delivered
    }

    /// Events not delivered because the session terminated first.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl EventSource for ScriptedSource {
    fn run(&mut self, mut handler: EventHandler) -> Result<()> {
        while let Some(event) = self.pending.pop_front() {
            let disposition = handler(&event);
            self.delivered.push((event, disposition));
            if disposition == Disposition::Terminate {
                tracing::debug!(remaining = self.pending.len(), "Scripted source unhooked");
                break;
            }
        }
        Ok(())
    }
}

/// System-wide keyboard grab.
#[derive(Debug, Clone, Default)]
pub struct KeyHook {
    guard: InjectionGuard,
}

impl KeyHook {
    /// Create a hook that lets backspaces announced on `guard` through
    /// without handing them to the handler.
    pub fn new(guard: InjectionGuard) -> Self {
        Self { guard }
    }
}

#[cfg(target_os = "windows")]
impl EventSource for KeyHook {
    /// Blocks the calling thread. `rdev::grab` cannot be stopped from the
    /// callback, so a terminating disposition exits the process with code 0.
    fn run(&mut self, handler: EventHandler) -> Result<()> {
        use cyrtype_core::error::CyrtypeError;
        use std::cell::RefCell;

        let guard = self.guard.clone();
        let handler = RefCell::new(handler);

        let callback = move |event: rdev::Event| -> Option<rdev::Event> {
            let Some(key_event) = to_key_event(&event) else {
                return Some(event);
            };
            if key_event.is_press() && key_event.name == "backspace" && guard.take_backspace() {
                return Some(event);
            }

            let disposition = (handler.borrow_mut())(&key_event);
            match disposition {
                Disposition::Pass => Some(event),
                Disposition::Suppress => None,
                Disposition::Terminate => {
                    tracing::info!("Keyboard unhooked, exiting");
                    std::process::exit(0);
                }
            }
        };

        tracing::info!("Global keyboard hook installed");
        rdev::grab(callback).map_err(|e| CyrtypeError::Hook(format!("{:?}", e)))
    }
}

#[cfg(not(target_os = "windows"))]
impl EventSource for KeyHook {
    fn run(&mut self, _handler: EventHandler) -> Result<()> {
        use cyrtype_core::error::CyrtypeError;

        tracing::warn!(
            pending_backspaces = self.guard.pending(),
            "Global keyboard hook is only available on Windows"
        );
        Err(CyrtypeError::Hook(
            "Global keyboard hook is only available on Windows".into(),
        ))
    }
}

#[cfg(target_os = "windows")]
fn to_key_event(event: &rdev::Event) -> Option<KeyEvent> {
    use cyrtype_core::types::KeyAction;
    use rdev::EventType;

    let (key, action) = match event.event_type {
        EventType::KeyPress(key) => (key, KeyAction::Down),
        EventType::KeyRelease(key) => (key, KeyAction::Up),
        _ => return None,
    };
    Some(KeyEvent {
        name: key_name(key, event.name.as_deref()),
        action,
    })
}

/// Name a key the way the router expects: control keys by name, keys that
/// type a single visible character by that character, anything else by a
/// multi-character identifier.
#[cfg(target_os = "windows")]
fn key_name(key: rdev::Key, text: Option<&str>) -> String {
    use rdev::Key;

    match key {
        Key::Space => "space".to_string(),
        Key::Return | Key::KpReturn => "enter".to_string(),
        Key::Backspace => "backspace".to_string(),
        Key::Escape => "esc".to_string(),
        // Unicode text injected with SendInput arrives as VK_PACKET.
        Key::Unknown(code) => format!("unknown({})", code),
        _ => {
            let mut chars = text.unwrap_or_default().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !c.is_control() => c.to_string(),
                _ => format!("{:?}", key).to_lowercase(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
