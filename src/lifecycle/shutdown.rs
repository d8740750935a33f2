//! Process-wide stop flag.
//!
//! Latched: once triggered it stays triggered, so a task that starts waiting
//! after the trigger still stops.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable handle shared by the server and background tasks.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Completes once [`Shutdown::trigger`] has been called, before or after this call.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // The sender lives as long as any handle; a closed channel also means stop.
            let _ = rx.wait_for(|stopped| *stopped).await;
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_trigger_wakes_waiting_tasks() {
        let shutdown = Shutdown::new();
        let a = tokio::spawn(shutdown.signal());
        let b = tokio::spawn(shutdown.clone().signal());
        assert!(!shutdown.is_triggered());

        shutdown.trigger();
        a.await.unwrap();
        b.await.unwrap();
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_signal_after_trigger_completes() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), shutdown.signal())
            .await
            .expect("late waiter did not see the trigger");
    }
}
