//! Single-writer ownership of a session.
//!
//! The router (and with it the session and its word buffer) is moved into
//! one tokio task. Event sources submit events through a [`SessionHandle`]
//! and wait for the disposition, so events are handled strictly one at a
//! time in arrival order no matter how many threads hold a handle.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use cyrtype_core::error::{CyrtypeError, Result};
use cyrtype_core::types::{Disposition, KeyEvent};

use crate::router::KeyEventRouter;
use crate::session::SessionStats;
use crate::sink::TextSink;

const QUEUE_DEPTH: usize = 64;

struct Request {
    event: KeyEvent,
    reply: oneshot::Sender<Disposition>,
}

/// Cloneable sender side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
}

impl SessionHandle {
    /// Submit an event and wait for its disposition.
    pub async fn dispatch(&self, event: KeyEvent) -> Result<Disposition> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request { event, reply })
            .await
            .map_err(|_| CyrtypeError::Session("session has ended".to_string()))?;
        rx.await
            .map_err(|_| CyrtypeError::Session("session dropped the event".to_string()))
    }

    /// Blocking variant for hook threads outside the runtime.
    ///
    /// Panics if called from within an async context.
    pub fn blocking_dispatch(&self, event: KeyEvent) -> Result<Disposition> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .blocking_send(Request { event, reply })
            .map_err(|_| CyrtypeError::Session("session has ended".to_string()))?;
        rx.blocking_recv()
            .map_err(|_| CyrtypeError::Session("session dropped the event".to_string()))
    }
}

/// Move `router` into a task and return a handle to feed it.
///
/// The task ends after a terminating event or once every handle is
/// dropped, and yields the final session statistics.
pub fn spawn<S>(router: KeyEventRouter<S>) -> (SessionHandle, JoinHandle<SessionStats>)
where
    S: TextSink + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Request>(QUEUE_DEPTH);

    let task = tokio::spawn(async move {
        let mut router = router;
        while let Some(Request { event, reply }) = rx.recv().await {
            let disposition = router.route(&event);
            if disposition == Disposition::Terminate {
                log_summary(&router);
                let _ = reply.send(disposition);
                break;
            }
            let _ = reply.send(disposition);
        }
        router.session().stats().clone()
    });

    (SessionHandle { tx }, task)
}

fn log_summary<S: TextSink>(router: &KeyEventRouter<S>) {
    let session = router.session();
    let stats = session.stats();
    tracing::info!(
        session_id = %session.id(),
        elapsed_secs = session.elapsed_secs(),
        words = stats.words_finalized,
        rewritten = stats.words_rewritten,
        corrected = stats.words_corrected,
        live_replacements = stats.live_replacements,
        "Session ended"
    );
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocorrect::{Autocorrector, DEFAULT_CUTOFF};
    use crate::dictionary::Dictionary;
    use crate::session::Session;
    use crate::sink::MemorySink;
    use crate::source::{EventSource, ScriptedSource};
    use crate::table::TranslitTable;

    fn router() -> KeyEventRouter<MemorySink> {
        let session = Session::new(
            TranslitTable::estonian_russian(),
            Autocorrector::new(Dictionary::from_words(["привет", "мир"]), DEFAULT_CUTOFF),
        );
        KeyEventRouter::new(session, MemorySink::new())
    }

    #[tokio::test]
    async fn test_dispatch_returns_dispositions() {
        let (handle, task) = spawn(router());

        assert_eq!(
            handle.dispatch(KeyEvent::down("m")).await.unwrap(),
            Disposition::Suppress
        );
        assert_eq!(
            handle.dispatch(KeyEvent::down("x")).await.unwrap(),
            Disposition::Pass
        );
        assert_eq!(
            handle.dispatch(KeyEvent::up("x")).await.unwrap(),
            Disposition::Pass
        );

        drop(handle);
        let stats = task.await.unwrap();
        assert_eq!(stats.live_replacements, 1);
    }

    #[tokio::test]
    async fn test_terminate_stops_the_actor() {
        let (handle, task) = spawn(router());
        let other = handle.clone();

        assert_eq!(
            handle.dispatch(KeyEvent::down("esc")).await.unwrap(),
            Disposition::Terminate
        );
        let stats = task.await.unwrap();
        assert_eq!(stats.words_finalized, 0);

        let err = other.dispatch(KeyEvent::down("a")).await.unwrap_err();
        assert!(matches!(err, CyrtypeError::Session(_)));
    }

    #[tokio::test]
    async fn test_concurrent_handles_are_serialized() {
        let (handle, task) = spawn(router());

        let mut joins = Vec::new();
        for _ in 0..8 {
            let h = handle.clone();
            joins.push(tokio::spawn(async move {
                for key in ["m", "i", "r", "space"] {
                    h.dispatch(KeyEvent::down(key)).await.unwrap();
                }
            }));
        }
        for join in joins {
            join.await.unwrap();
        }
        drop(handle);

        let stats = task.await.unwrap();
        // Every key was applied exactly once, whatever the interleaving.
        assert_eq!(stats.live_replacements, 24);
    }

    #[tokio::test]
    async fn test_blocking_dispatch_from_hook_thread() {
        let (handle, task) = spawn(router());

        let delivered = tokio::task::spawn_blocking(move || {
            let mut source = ScriptedSource::typing(["m", "i", "r", "space", "esc", "a"]);
            source
                .run(Box::new(move |event| {
                    handle
                        .blocking_dispatch(event.clone())
                        .unwrap_or(Disposition::Pass)
                }))
                .unwrap();
            source.delivered().to_vec()
        })
        .await
        .unwrap();

        let stats = task.await.unwrap();
        assert_eq!(stats.words_finalized, 1);
        assert_eq!(delivered.last().unwrap().1, Disposition::Terminate);
        assert_eq!(delivered.len(), 9);
    }
}
