use async_stream::stream;
use futures::stream::{Stream, StreamExt};
use std::time::Duration;
use tokio::time::{sleep, Instant};

enum Step<T> {
    Arrived(T),
    Quiet,
    Finished,
}

/// Emit an item only after `window` has passed without a newer one.
///
/// Superseded items are discarded. A pending item is flushed when the input ends.
pub fn debounce<S>(input: S, window: Duration) -> impl Stream<Item = S::Item> + Send
where
    S: Stream + Send + 'static,
    S::Item: Send,
{
    stream! {
        let mut input = Box::pin(input);
        let mut pending = None;
        let timer = sleep(window);
        tokio::pin!(timer);

        loop {
            let step = tokio::select! {
                next = input.next() => match next {
                    Some(item) => Step::Arrived(item),
                    None => Step::Finished,
                },
                () = &mut timer, if pending.is_some() => Step::Quiet,
            };

            match step {
                Step::Arrived(item) => {
                    pending = Some(item);
                    timer.as_mut().reset(Instant::now() + window);
                }
                Step::Quiet => {
                    if let Some(item) = pending.take() {
                        yield item;
                    }
                }
                Step::Finished => {
                    if let Some(item) = pending.take() {
                        yield item;
                    }
                    break;
                }
            }
        }
    }
}
