//! Deadline and cancellation scope for a lookup.
//!
//! A [`LookupContext`] carries an optional absolute deadline and an optional
//! cancellation signal. Children derived with [`LookupContext::with_timeout`]
//! keep the parent's signal and never extend the parent's deadline.

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a context finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    Canceled,
    DeadlineExceeded,
}

impl fmt::Display for DoneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoneReason::Canceled => f.write_str("context canceled"),
            DoneReason::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

/// Deadline and cancellation scope handed to every source call.
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every context derived from the one it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl LookupContext {
    /// A context with no deadline that is never canceled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A cancellable root context.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            deadline: None,
            cancel: Some(rx),
        };
        (ctx, CancelHandle { tx })
    }

    /// Derive a child whose deadline is the earlier of the parent's deadline
    /// and `now + timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < candidate => parent,
            _ => candidate,
        };
        Self {
            deadline: Some(deadline),
            cancel: self.cancel.clone(),
        }
    }

    /// Absolute deadline, `None` when the context has none.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Resolve once the context is canceled or its deadline passes.
    ///
    /// Pends forever on a background context.
    pub async fn done(&self) -> DoneReason {
        let canceled = async {
            match self.cancel.clone() {
                Some(mut rx) => loop {
                    if *rx.borrow_and_update() {
                        return;
                    }
                    // Handle dropped without canceling: this scope can no
                    // longer be canceled.
                    if rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                },
                None => std::future::pending::<()>().await,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = canceled => DoneReason::Canceled,
                () = tokio::time::sleep_until(deadline) => DoneReason::DeadlineExceeded,
            },
            None => {
                canceled.await;
                DoneReason::Canceled
            }
        }
    }
}
