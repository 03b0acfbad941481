// ABOUTME: Shared execution deadline combining a fixed timeout with an early cancel trigger
// ABOUTME: Provides a one-shot broadcast cancellation signal observable by all supervisors

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Why the deadline fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelCause {
    TimeoutExceeded,
    CancelledExternally,
}

impl std::fmt::Display for CancelCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelCause::TimeoutExceeded => write!(f, "timeout exceeded"),
            CancelCause::CancelledExternally => write!(f, "cancelled externally"),
        }
    }
}

/// Shared deadline signal handed to every supervisor.
///
/// Fires at most once, either when the configured timeout elapses or when
/// [`CancelHandle::cancel`] is invoked, whichever comes first. Once fired it
/// stays fired; the first cause wins and is the only cause ever observed.
/// Clones observe the same underlying signal.
#[derive(Debug, Clone)]
pub struct Deadline {
    tx: Arc<watch::Sender<Option<CancelCause>>>,
    rx: watch::Receiver<Option<CancelCause>>,
}

/// Trigger for firing the deadline early. Safe to invoke from any task any
/// number of times; only the first effective fire is observable.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<Option<CancelCause>>>,
}

impl Deadline {
    /// Create a deadline that fires with `TimeoutExceeded` after `timeout`.
    ///
    /// Must be called from within a Tokio runtime; the timeout is driven by
    /// a detached timer task.
    pub fn new(timeout: Duration) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);

        let timer_tx = Arc::clone(&tx);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if fire(&timer_tx, CancelCause::TimeoutExceeded) {
                debug!("Execution deadline of {:?} reached", timeout);
            }
        });

        let handle = CancelHandle {
            tx: Arc::clone(&tx),
        };

        (Self { tx, rx }, handle)
    }

    /// Wait until the deadline fires and return the cause. Resolves
    /// immediately if it already fired.
    pub async fn fired(&self) -> CancelCause {
        let mut rx = self.rx.clone();
        loop {
            if let Some(cause) = *rx.borrow_and_update() {
                return cause;
            }
            // All senders gone without firing cannot happen while `self`
            // holds one, but treat it as an external cancellation anyway.
            if rx.changed().await.is_err() {
                return CancelCause::CancelledExternally;
            }
        }
    }

    /// Current cause, if the deadline has fired.
    pub fn cause(&self) -> Option<CancelCause> {
        *self.rx.borrow()
    }

    /// A fresh cancel handle for this deadline.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl CancelHandle {
    /// Fire the deadline with `CancelledExternally`. Idempotent: calling
    /// repeatedly, or after the timeout already fired, changes nothing.
    pub fn cancel(&self) {
        if fire(&self.tx, CancelCause::CancelledExternally) {
            debug!("Execution cancelled externally");
        }
    }
}

/// One-shot transition: returns true only for the call that actually fired.
fn fire(tx: &watch::Sender<Option<CancelCause>>, cause: CancelCause) -> bool {
    tx.send_if_modified(|state| {
        if state.is_none() {
            *state = Some(cause);
            true
        } else {
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_deadline_fires_on_timeout() {
        let (deadline, _handle) = Deadline::new(Duration::from_millis(50));

        assert_eq!(deadline.cause(), None);

        let cause = timeout(Duration::from_secs(2), deadline.fired())
            .await
            .unwrap();
        assert_eq!(cause, CancelCause::TimeoutExceeded);
        assert_eq!(deadline.cause(), Some(CancelCause::TimeoutExceeded));
    }

    #[tokio::test]
    async fn test_cancel_before_timeout() {
        let (deadline, handle) = Deadline::new(Duration::from_secs(60));

        handle.cancel();

        let cause = timeout(Duration::from_secs(2), deadline.fired())
            .await
            .unwrap();
        assert_eq!(cause, CancelCause::CancelledExternally);
    }

    #[tokio::test]
    async fn test_first_cause_wins() {
        let (deadline, handle) = Deadline::new(Duration::from_millis(20));

        sleep(Duration::from_millis(100)).await;
        handle.cancel();
        handle.cancel();

        assert_eq!(deadline.cause(), Some(CancelCause::TimeoutExceeded));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let (deadline, handle) = Deadline::new(Duration::from_secs(60));

        handle.cancel();
        handle.cancel();
        handle.clone().cancel();

        assert_eq!(deadline.cause(), Some(CancelCause::CancelledExternally));
    }

    #[tokio::test]
    async fn test_all_clones_observe_the_fire() {
        let (deadline, handle) = Deadline::new(Duration::from_secs(60));

        let waiters: Vec<_> = (0..8)
            .map(|_| {
                let deadline = deadline.clone();
                tokio::spawn(async move { deadline.fired().await })
            })
            .collect();

        handle.cancel();

        for waiter in waiters {
            let cause = timeout(Duration::from_secs(2), waiter)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(cause, CancelCause::CancelledExternally);
        }
    }

    #[tokio::test]
    async fn test_fired_resolves_after_the_fact() {
        let (deadline, handle) = Deadline::new(Duration::from_secs(60));

        handle.cancel();
        sleep(Duration::from_millis(10)).await;

        // A late waiter must still observe the fire without racing.
        let cause = timeout(Duration::from_secs(2), deadline.fired())
            .await
            .unwrap();
        assert_eq!(cause, CancelCause::CancelledExternally);
    }
}
