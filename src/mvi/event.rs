use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

/// Stream of events handed to a subscriber
pub type EventStream<E> = UnboundedReceiverStream<E>;

/// Ordered multicast bus for user intents.
///
/// A subscriber sees every event emitted after it subscribed, in emission order.
/// Each subscriber has its own unbounded queue, so a slow one never loses events.
/// Streams end once the bus is dropped.
pub struct EventBus<E> {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<E>>>,
}

impl<E: Clone + Send + std::fmt::Debug + 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<E>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn emit(&self, event: E) {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if subscribers.is_empty() {
            debug!(?event, "event emitted without subscribers");
        }
    }

    /// Events emitted from now on
    pub fn subscribe(&self) -> EventStream<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        UnboundedReceiverStream::new(rx)
    }
}

impl<E: Clone + Send + std::fmt::Debug + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use tokio_stream::StreamExt;

    #[derive(Debug, Clone, PartialEq)]
    enum Intent {
        Refresh,
        Type(&'static str),
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_events_in_order() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.emit(Intent::Type("a"));
        bus.emit(Intent::Refresh);

        assert_eq!(first.next().await, Some(Intent::Type("a")));
        assert_eq!(first.next().await, Some(Intent::Refresh));
        assert_eq!(second.next().await, Some(Intent::Type("a")));
        assert_eq!(second.next().await, Some(Intent::Refresh));
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.emit(Intent::Refresh);

        let mut late = bus.subscribe();
        bus.emit(Intent::Type("b"));

        assert_eq!(late.next().await, Some(Intent::Type("b")));
    }

    #[tokio::test]
    async fn test_idle_subscriber_keeps_every_event_of_a_burst() {
        let bus = EventBus::new();
        let mut idle = bus.subscribe();

        bus.emit(Intent::Refresh);
        for _ in 0..500 {
            bus.emit(Intent::Type("x"));
        }

        let mut seen = Vec::new();
        while let Some(Some(event)) = idle.next().now_or_never() {
            seen.push(event);
        }
        assert_eq!(seen.len(), 501);
        assert_eq!(seen[0], Intent::Refresh);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_block_others() {
        let bus = EventBus::new();
        let gone = bus.subscribe();
        let mut kept = bus.subscribe();
        drop(gone);

        bus.emit(Intent::Refresh);
        assert_eq!(kept.next().await, Some(Intent::Refresh));
        assert_eq!(bus.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_ends_when_bus_is_dropped() {
        let bus: EventBus<Intent> = EventBus::new();
        let mut events = bus.subscribe();
        drop(bus);
        assert_eq!(events.next().await, None);
    }
}
