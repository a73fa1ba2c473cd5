//! Text injection into the focused application.
//!
//! [`TextSink`] is the narrow capability the engine writes through.
//! [`TextInjector`] binds it to the Windows `SendInput` API; on other
//! platforms it returns an error for every call. [`MemorySink`] is an
//! in-memory text field used to drive the engine without an OS.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(not(target_os = "windows"))]
use tracing::warn;

use cyrtype_core::error::{CyrtypeError, Result};

/// Destination for synthesized keystrokes.
pub trait TextSink: Send {
    /// Type `text` into the focused application.
    fn write(&mut self, text: &str) -> Result<()>;

    /// Send `count` backspace keystrokes.
    fn backspace(&mut self, count: usize) -> Result<()>;
}

/// Counts backspaces we injected so the keyboard hook can recognise them
/// when they come back around and let them through untouched.
#[derive(Debug, Clone, Default)]
pub struct InjectionGuard {
    pending_backspaces: Arc<AtomicUsize>,
}

impl InjectionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` backspaces about to be injected.
    pub fn expect_backspaces(&self, count: usize) {
        self.pending_backspaces.fetch_add(count, Ordering::SeqCst);
    }

    /// Consume one expected backspace. Returns `true` if the observed
    /// backspace was one of ours.
    pub fn take_backspace(&self) -> bool {
        self.pending_backspaces
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn pending(&self) -> usize {
        self.pending_backspaces.load(Ordering::SeqCst)
    }
}

/// Injects text through the Windows `SendInput` API.
#[derive(Debug, Clone, Default)]
pub struct TextInjector {
    guard: InjectionGuard,
}

impl TextInjector {
    /// Create a new text injector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an injector that reports its backspaces to `guard`.
    pub fn with_guard(guard: InjectionGuard) -> Self {
        Self { guard }
    }

    pub fn guard(&self) -> &InjectionGuard {
        &self.guard
    }

    #[cfg(target_os = "windows")]
    fn send(inputs: &[windows_sys::Win32::UI::Input::KeyboardAndMouse::INPUT]) -> Result<()> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::{SendInput, INPUT};

        if inputs.is_empty() {
            return Ok(());
        }

        let sent = unsafe {
            SendInput(
                inputs.len() as u32,
                inputs.as_ptr(),
                std::mem::size_of::<INPUT>() as i32,
            )
        };

        if sent as usize != inputs.len() {
            return Err(CyrtypeError::Injection(format!(
                "SendInput only sent {} of {} events",
                sent,
                inputs.len()
            )));
        }
        Ok(())
    }

    #[cfg(target_os = "windows")]
    fn key_input(vk: u16, scan: u16, flags: u32) -> windows_sys::Win32::UI::Input::KeyboardAndMouse::INPUT {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
            INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT,
        };

        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    wScan: scan,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }
    }
}

#[cfg(target_os = "windows")]
impl TextSink for TextInjector {
    /// Each UTF-16 unit is sent as a Unicode key-down / key-up pair.
    fn write(&mut self, text: &str) -> Result<()> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::{KEYEVENTF_KEYUP, KEYEVENTF_UNICODE};

        let mut inputs = Vec::new();
        for unit in text.encode_utf16() {
            inputs.push(Self::key_input(0, unit, KEYEVENTF_UNICODE));
            inputs.push(Self::key_input(0, unit, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP));
        }
        Self::send(&inputs)?;
        tracing::trace!(chars = text.chars().count(), "Text injected");
        Ok(())
    }

    fn backspace(&mut self, count: usize) -> Result<()> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::{KEYEVENTF_KEYUP, VK_BACK};

        if count == 0 {
            return Ok(());
        }
        let mut inputs = Vec::with_capacity(count * 2);
        for _ in 0..count {
            inputs.push(Self::key_input(VK_BACK, 0, 0));
            inputs.push(Self::key_input(VK_BACK, 0, KEYEVENTF_KEYUP));
        }
        self.guard.expect_backspaces(count);
        if let Err(e) = Self::send(&inputs) {
            // Nothing reached the hook; forget what we announced.
            for _ in 0..count {
                self.guard.take_backspace();
            }
            return Err(e);
        }
        tracing::trace!(count, "Backspaces injected");
        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
impl TextSink for TextInjector {
    fn write(&mut self, text: &str) -> Result<()> {
        warn!(
            chars = text.chars().count(),
            "TextInjector: SendInput not available on this platform"
        );
        Err(CyrtypeError::Injection(
            "Text injection is only available on Windows".into(),
        ))
    }

    fn backspace(&mut self, count: usize) -> Result<()> {
        warn!(count, "TextInjector: SendInput not available on this platform");
        Err(CyrtypeError::Injection(
            "Text injection is only available on Windows".into(),
        ))
    }
}

/// One call made on a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOp {
    Write(String),
    Backspace(usize),
}

/// In-memory text field: writes append, backspaces delete from the end.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    text: String,
    ops: Vec<SinkOp>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text the field would show now.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every call received, in order.
    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    /// Total backspaces received.
    pub fn backspaces(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                SinkOp::Backspace(n) => *n,
                SinkOp::Write(_) => 0,
            })
            .sum()
    }

    /// Simulate the application receiving a key the engine let through.
    pub fn passthrough(&mut self, c: char) {
        self.text.push(c);
    }

    /// Simulate the user deleting one character the engine never saw.
    pub fn delete_last(&mut self) {
        self.text.pop();
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl TextSink for MemorySink {
    fn write(&mut self, text: &str) -> Result<()> {
        self.text.push_str(text);
        self.ops.push(SinkOp::Write(text.to_string()));
        Ok(())
    }

    fn backspace(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.text.pop();
        }
        self.ops.push(SinkOp::Backspace(count));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_edits_text() {
        let mut sink = MemorySink::new();
        sink.write("привэт").unwrap();
        sink.backspace(2).unwrap();
        sink.write("ет").unwrap();
        assert_eq!(sink.text(), "привет");
        assert_eq!(sink.backspaces(), 2);
        assert_eq!(
            sink.ops(),
            &[
                SinkOp::Write("привэт".to_string()),
                SinkOp::Backspace(2),
                SinkOp::Write("ет".to_string()),
            ]
        );
    }

    #[test]
    fn test_memory_sink_backspace_past_start() {
        let mut sink = MemorySink::new();
        sink.passthrough('x');
        sink.backspace(3).unwrap();
        assert_eq!(sink.text(), "");
    }

    #[test]
    fn test_memory_sink_passthrough_is_not_an_op() {
        let mut sink = MemorySink::new();
        sink.passthrough('c');
        sink.passthrough('d');
        sink.delete_last();
        assert_eq!(sink.text(), "c");
        assert!(sink.ops().is_empty());
    }

    #[test]
    fn test_injection_guard_counts() {
        let guard = InjectionGuard::new();
        assert!(!guard.take_backspace());

        guard.expect_backspaces(2);
        let shared = guard.clone();
        assert_eq!(shared.pending(), 2);
        assert!(shared.take_backspace());
        assert!(guard.take_backspace());
        assert!(!guard.take_backspace());
        assert_eq!(guard.pending(), 0);
    }

    #[test]
    fn test_text_injector_default() {
        let injector = TextInjector::default();
        assert_eq!(injector.guard().pending(), 0);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_text_inject_returns_error_on_non_windows() {
        let mut injector = TextInjector::new();
        let result = injector.write("привет");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("only available on Windows"));
        assert!(injector.backspace(1).is_err());
        assert_eq!(injector.guard().pending(), 0);
    }
}
