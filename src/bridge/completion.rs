//! Single-resolution completion signal for an exchange.

use tokio::sync::watch;

/// Resolves exactly once; later resolutions are no-ops.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: watch::Sender<bool>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Resolve the signal. Returns true only for the call that resolved it.
    pub fn resolve(&self) -> bool {
        self.tx.send_if_modified(|done| {
            if *done {
                false
            } else {
                *done = true;
                true
            }
        })
    }

    pub fn is_resolved(&self) -> bool {
        *self.tx.borrow()
    }

    /// A waiter that completes once the signal resolves.
    pub fn waiter(&self) -> CompletionWaiter {
        CompletionWaiter {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaits a [`CompletionSignal`]. Any number of waiters may exist.
#[derive(Debug, Clone)]
pub struct CompletionWaiter {
    rx: watch::Receiver<bool>,
}

impl CompletionWaiter {
    /// Wait for resolution. A dropped signal counts as resolved.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|done| *done).await;
    }
}
