//! One-shot notification of whether a momentum run got going.
//!
//! Each Ended sample creates its own listeners. They move into the run they belong to
//! and resolve exactly once, so a later registration can never overwrite one that is
//! still waiting.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Why a momentum run did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Too long since the last movement, or no movement recorded at all
    Stale,
    /// Exit speed at or below the stop speed
    TooSlow,
    /// The caller asked for no momentum on this gesture
    Disabled,
}

/// How a gesture's momentum decision played out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumOutcome {
    /// The first momentum frame was emitted
    Started,
    /// Momentum was decided against; no momentum frames were emitted
    Skipped(SkipReason),
    /// The run was stopped before its first frame, or the engine went away
    Cancelled,
}

/// Callback form of a momentum listener.
pub type MomentumCallback = Box<dyn FnOnce(MomentumOutcome) + Send + 'static>;

/// A party waiting for a run's outcome.
pub enum MomentumListener {
    Callback(MomentumCallback),
    Notice(oneshot::Sender<MomentumOutcome>),
}

impl MomentumListener {
    pub fn resolve(self, outcome: MomentumOutcome) {
        match self {
            MomentumListener::Callback(callback) => callback(outcome),
            MomentumListener::Notice(tx) => {
                // Receiver may have been dropped; nobody is listening then
                let _ = tx.send(outcome);
            }
        }
    }
}

impl std::fmt::Debug for MomentumListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MomentumListener::Callback(_) => f.write_str("MomentumListener::Callback"),
            MomentumListener::Notice(_) => f.write_str("MomentumListener::Notice"),
        }
    }
}

/// Resolve every listener with the same outcome.
pub fn resolve_all(listeners: Vec<MomentumListener>, outcome: MomentumOutcome) {
    for listener in listeners {
        listener.resolve(outcome);
    }
}

/// Future side of a [`MomentumListener::Notice`].
#[derive(Debug)]
pub struct MomentumNotice {
    rx: oneshot::Receiver<MomentumOutcome>,
}

impl MomentumNotice {
    /// Create a connected listener/notice pair.
    pub fn channel() -> (MomentumListener, MomentumNotice) {
        let (tx, rx) = oneshot::channel();
        (MomentumListener::Notice(tx), MomentumNotice { rx })
    }
}

impl Future for MomentumNotice {
    type Output = MomentumOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(MomentumOutcome::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[test]
    fn notice_resolves_once_sent() {
        let (listener, notice) = MomentumNotice::channel();
        let mut notice = task::spawn(notice);
        assert_pending!(notice.poll());

        listener.resolve(MomentumOutcome::Started);
        assert!(notice.is_woken());
        assert_ready_eq!(notice.poll(), MomentumOutcome::Started);
    }

    #[test]
    fn dropped_listener_reads_as_cancelled() {
        let (listener, notice) = MomentumNotice::channel();
        drop(listener);
        let mut notice = task::spawn(notice);
        assert_ready_eq!(notice.poll(), MomentumOutcome::Cancelled);
    }

    #[test]
    fn callbacks_run_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let listener = MomentumListener::Callback(Box::new(move |outcome| {
            assert_eq!(outcome, MomentumOutcome::Skipped(SkipReason::TooSlow));
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        resolve_all(vec![listener], MomentumOutcome::Skipped(SkipReason::TooSlow));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
