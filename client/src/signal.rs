//! Cooperative cancellation shared between the interrupt listener and the event loop

use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

struct Inner {
    flag: AtomicBool,
    notify: Notify,
}

/// A flag that is set at most once and never cleared.
///
/// Clones share the same flag. Setting it wakes every task currently parked in
/// [`CancellationSignal::cancelled`], which is how an interrupt breaks the event
/// loop out of its wait.
#[derive(Clone)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                flag: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Sets the flag. Returns `true` only for the call that actually set it.
    pub fn cancel(&self) -> bool {
        let first = !self.inner.flag.swap(true, Ordering::SeqCst);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Resolves once the flag is set. Returns immediately if it already is.
    pub async fn cancelled(&self) {
        // Registered before the flag check so a concurrent cancel is not missed.
        let notified = self.inner.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Sets the flag when the process receives an interrupt (SIGINT / Ctrl-C).
    pub fn listen_for_interrupt(&self) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received interrupt, shutting down");
                    signal.cancel();
                }
                Err(e) => error!("Failed to listen for interrupt: {}", e),
            }
        })
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_signal_starts_clear() {
        let signal = CancellationSignal::new();
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn test_cancel_is_set_once() {
        let signal = CancellationSignal::new();
        let clone = signal.clone();

        assert!(clone.cancel());
        assert!(!signal.cancel());
        assert!(signal.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_when_already_set() {
        let signal = CancellationSignal::new();
        signal.cancel();

        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("cancelled() should resolve immediately");
    }

    #[tokio::test]
    async fn test_cancel_wakes_waiter() {
        let signal = CancellationSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };

        tokio::task::yield_now().await;
        signal.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter task should not panic");
    }
}
