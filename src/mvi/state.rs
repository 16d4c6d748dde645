use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Stream of states handed to an observer
pub type StateStream<S> = UnboundedReceiverStream<S>;

struct Inner<S> {
    current: S,
    subscribers: Vec<mpsc::UnboundedSender<S>>,
}

/// Observable state cell.
///
/// Updates are applied one at a time under a lock. Each subscriber first
/// receives the state current at subscription time, then every later state in
/// the order updates were applied. Nothing is conflated or dropped.
pub struct StateCell<S> {
    inner: Mutex<Inner<S>>,
}

impl<S: Clone + Send + 'static> StateCell<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state
    pub fn current(&self) -> S {
        self.lock().current.clone()
    }

    pub fn subscribe(&self) -> StateStream<S> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        // A fresh receiver is alive, the send cannot fail.
        let _ = tx.send(inner.current.clone());
        inner.subscribers.push(tx);
        UnboundedReceiverStream::new(rx)
    }

    /// Replace the state with `reducer(current)` and publish it
    pub fn update<F>(&self, reducer: F)
    where
        F: FnOnce(&S) -> S,
    {
        let mut inner = self.lock();
        let next = reducer(&inner.current);
        inner.current = next;
        let Inner {
            current,
            subscribers,
        } = &mut *inner;
        subscribers.retain(|tx| tx.send(current.clone()).is_ok());
    }
}
