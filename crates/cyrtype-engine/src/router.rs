//! Key classification and dispatch.

use cyrtype_core::types::{Disposition, Key, KeyEvent};

use crate::session::Session;
use crate::sink::TextSink;

/// Drives a [`Session`] from raw key events, writing through `sink`.
///
/// Releases are ignored. `esc` ends the session, `space` and `enter` close
/// the word, `backspace` edits it and single characters extend it. Any
/// other named key passes through without touching the word. A failure
/// while injecting never escapes: the current word is forgotten and the
/// key is let through as typed.
#[derive(Debug)]
pub struct KeyEventRouter<S: TextSink> {
    session: Session,
    sink: S,
}

impl<S: TextSink> KeyEventRouter<S> {
    pub fn new(session: Session, sink: S) -> Self {
        Self { session, sink }
    }

    /// Handle one event and report what the event source must do with it.
    pub fn route(&mut self, event: &KeyEvent) -> Disposition {
        if !event.is_press() {
            return Disposition::Pass;
        }

        let result = match event.key() {
            Key::Esc => {
                tracing::info!(
                    session_id = %self.session.id(),
                    pending = self.session.buffer().len(),
                    "Escape pressed, ending session"
                );
                self.session.reset_word();
                return Disposition::Terminate;
            }
            Key::Space => self.session.finish_word(' ', &mut self.sink),
            Key::Enter => self.session.finish_word('\n', &mut self.sink),
            Key::Backspace => self.session.backspace(&mut self.sink),
            Key::Char(c) => self.session.type_char(c, &mut self.sink),
            Key::Other(name) => {
                tracing::trace!(key = %name, "Passing through unrecognised key");
                return Disposition::Pass;
            }
        };

        match result {
            Ok(disposition) => disposition,
            Err(e) => {
                tracing::warn!(error = %e, "Key handling failed, passing key through");
                tracing::debug!(key = %event.name, "Key passed through after failure");
                self.session.reset_word();
                Disposition::Pass
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (Session, S) {
        (self.session, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocorrect::{Autocorrector, DEFAULT_CUTOFF};
    use crate::dictionary::Dictionary;
    use crate::sink::{MemorySink, SinkOp};
    use crate::table::TranslitTable;
    use cyrtype_core::error::{CyrtypeError, Result};
    use std::sync::{Arc, Mutex};

    fn session() -> Session {
        Session::new(
            TranslitTable::estonian_russian(),
            Autocorrector::new(Dictionary::from_words(["привет"]), DEFAULT_CUTOFF),
        )
    }

    fn router() -> KeyEventRouter<MemorySink> {
        KeyEventRouter::new(session(), MemorySink::new())
    }

    #[test]
    fn test_release_events_ignored() {
        let mut router = router();
        assert_eq!(router.route(&KeyEvent::up("a")), Disposition::Pass);
        assert_eq!(router.route(&KeyEvent::up("esc")), Disposition::Pass);
        assert!(router.session().buffer().is_empty());
        assert!(router.sink().ops().is_empty());
    }

    #[test]
    fn test_escape_terminates_and_discards_word() {
        let mut router = router();
        router.route(&KeyEvent::down("p"));
        assert_eq!(router.route(&KeyEvent::down("esc")), Disposition::Terminate);
        assert!(router.session().buffer().is_empty());
        // Nothing flushed.
        assert_eq!(router.sink().ops(), &[SinkOp::Write("п".to_string())]);
    }

    #[test]
    fn test_unrecognised_key_passes_without_reset() {
        let mut router = router();
        router.route(&KeyEvent::down("p"));
        assert_eq!(router.route(&KeyEvent::down("shift")), Disposition::Pass);
        assert_eq!(router.route(&KeyEvent::down("left")), Disposition::Pass);
        assert_eq!(router.session().buffer().raw(), "p");
    }

    #[test]
    fn test_space_and_enter_emit_boundary() {
        let mut router = router();
        assert_eq!(router.route(&KeyEvent::down("space")), Disposition::Suppress);
        assert_eq!(router.route(&KeyEvent::down("enter")), Disposition::Suppress);
        assert_eq!(router.sink().text(), " \n");
    }

    #[test]
    fn test_backspace_suppressed_and_forwarded() {
        let mut router = router();
        router.route(&KeyEvent::down("p"));
        router.route(&KeyEvent::down("r"));
        assert_eq!(router.route(&KeyEvent::down("backspace")), Disposition::Suppress);
        assert_eq!(router.session().buffer().raw(), "p");
        assert_eq!(router.sink().text(), "п");
    }

    struct FailingSink;

    impl TextSink for FailingSink {
        fn write(&mut self, _text: &str) -> Result<()> {
            Err(CyrtypeError::Injection("unplugged".to_string()))
        }

        fn backspace(&mut self, _count: usize) -> Result<()> {
            Err(CyrtypeError::Injection("unplugged".to_string()))
        }
    }

    #[test]
    fn test_sink_failure_degrades_to_pass() {
        let mut router = KeyEventRouter::new(session(), FailingSink);
        assert_eq!(router.route(&KeyEvent::down("p")), Disposition::Pass);
        assert!(router.session().buffer().is_empty());
        assert_eq!(router.route(&KeyEvent::down("space")), Disposition::Pass);
        assert_eq!(router.route(&KeyEvent::down("backspace")), Disposition::Pass);
        assert_eq!(router.route(&KeyEvent::down("esc")), Disposition::Terminate);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_warning_omits_typed_key() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_target(false)
            .finish();

        // "q" has its own rule here so typing it reaches the failing sink.
        let table = TranslitTable::from_rules([("q", 'ж')]).unwrap();
        let session = Session::new(
            table,
            Autocorrector::new(Dictionary::default(), DEFAULT_CUTOFF),
        );
        let mut router = KeyEventRouter::new(session, FailingSink);

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(router.route(&KeyEvent::down("q")), Disposition::Pass);
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Key handling failed"));
        assert!(!output.contains("key="));
        assert!(!output.contains('q'));
    }

    #[test]
    fn test_enter_after_word_emits_newline() {
        let mut router = router();
        router.route(&KeyEvent::down("m"));
        assert_eq!(router.route(&KeyEvent::down("enter")), Disposition::Suppress);
        assert_eq!(router.sink().text(), "м\n");
        assert!(router.session().buffer().is_empty());
    }

    #[test]
    fn test_into_parts() {
        let mut router = router();
        router.route(&KeyEvent::down("m"));
        let (session, sink) = router.into_parts();
        assert_eq!(session.buffer().raw(), "m");
        assert_eq!(sink.text(), "м");
    }
}
