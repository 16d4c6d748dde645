use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Buffered one-shot side effects.
///
/// Effects sent while nobody listens are queued. Each effect is handed out
/// exactly once, to whichever consumer takes it first, and never replayed.
pub struct EffectQueue<F> {
    sender: mpsc::UnboundedSender<F>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<F>>>,
}

impl<F: Send + 'static> EffectQueue<F> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    pub fn send(&self, effect: F) {
        // The queue owns its receiver, so the channel is never closed here.
        let _ = self.sender.send(effect);
    }

    /// Wait for the next effect
    pub async fn next(&self) -> Option<F> {
        self.receiver.lock().await.recv().await
    }

    /// Take a queued effect without waiting. Returns `None` when the queue is
    /// empty or another consumer is currently waiting on it.
    pub fn try_next(&self) -> Option<F> {
        self.receiver.try_lock().ok()?.try_recv().ok()
    }

    pub fn effects(&self) -> impl Stream<Item = F> + Send + 'static {
        stream::unfold(self.receiver.clone(), |receiver| async move {
            let effect = receiver.lock().await.recv().await;
            effect.map(|effect| (effect, receiver))
        })
    }
}

impl<F: Send + 'static> Default for EffectQueue<F> {
    fn default() -> Self {
        Self::new()
    }
}
