use std::future::Future;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

/// Task scope owned by a controller.
///
/// Work launched here stops at its next suspension point once the scope is
/// cancelled. After [`Scope::shutdown`] returns, every launched task has ended.
#[derive(Clone, Default)]
pub struct Scope {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.token.is_cancelled() {
            debug!("scope cancelled, dropping launched work");
            return;
        }
        let token = self.token.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = work => {}
            }
        });
    }

    pub fn cancel(&self) {
        self.tracker.close();
        self.token.cancel();
    }

    pub async fn shutdown(&self) {
        self.cancel();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_pending_work() {
        let scope = Scope::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        {
            let ticks = ticks.clone();
            scope.launch(async move {
                loop {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            });
        }
        tokio::time::sleep(Duration::from_millis(2500)).await;
        scope.shutdown().await;
        let after_shutdown = ticks.load(Ordering::SeqCst);
        assert_eq!(after_shutdown, 3);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_shutdown);
    }

    #[tokio::test]
    async fn test_launch_after_cancel_is_ignored() {
        let scope = Scope::new();
        scope.cancel();
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let ran = ran.clone();
            scope.launch(async move {
                ran.fetch_add(1, Ordering::SeqCst);
            });
        }
        scope.shutdown().await;
        assert!(scope.token.is_cancelled());
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }
}
