//! Cooperative cancellation for scoring batches.
//!
//! A `CancelToken` fires when its `CancelHandle` calls `cancel()` or when its
//! deadline passes, whichever comes first. Tokens are cheap to clone.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Fires every token cloned from its pair.
#[allow(dead_code)]
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

#[allow(dead_code)]
impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace never fails, even with no live receivers
        self.tx.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A handle/token pair with no deadline.
    #[allow(dead_code)]
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx, deadline: None })
    }

    /// A token that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        CancelToken { rx, deadline: None }
    }

    /// A token that fires once `timeout` has elapsed.
    pub fn after(timeout: Duration) -> Self {
        Self::never().with_deadline(timeout)
    }

    pub fn with_deadline(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the token fires. Pending forever for `never()`.
    pub async fn cancelled(&mut self) {
        let deadline = self.deadline;
        let signalled = async {
            loop {
                if *self.rx.borrow_and_update() {
                    return;
                }
                if self.rx.changed().await.is_err() {
                    // Handle dropped without cancelling
                    std::future::pending::<()>().await;
                }
            }
        };

        match deadline {
            Some(at) => {
                tokio::select! {
                    _ = signalled => {}
                    _ = tokio::time::sleep_until(at) => {}
                }
            }
            None => signalled.await,
        }
    }
}
