//! EventStream - pull-side view of a subscription as a `futures::Stream`.
//!
//! The subscription pushes notifications into an unbounded channel; the
//! stream yields them in arrival order. There is no backpressure: a slow
//! consumer only grows the queue.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{FusedStream, Stream};
use tokio::sync::mpsc;

use crate::domain::foundation::{BridgeError, SubscriptionId};

use super::observer::Observer;
use super::subscription::{Subscription, SubscriptionState};

/// One notification of an observable sequence.
#[derive(Debug)]
pub(crate) enum Notification<T> {
    Next(T),
    Error(BridgeError),
    Completed,
}

/// Observer that forwards into an [`EventStream`].
pub(crate) struct ChannelObserver<T> {
    sender: mpsc::UnboundedSender<Notification<T>>,
}

impl<T: Send> Observer<T> for ChannelObserver<T> {
    fn on_next(&self, value: T) {
        // A closed receiver means the stream was dropped; nothing to do.
        let _ = self.sender.send(Notification::Next(value));
    }

    fn on_error(&self, error: BridgeError) {
        let _ = self.sender.send(Notification::Error(error));
    }

    fn on_completed(&self) {
        let _ = self.sender.send(Notification::Completed);
    }
}

/// Creates the observer half and the receiving half of an event stream.
pub(crate) fn channel<T>() -> (ChannelObserver<T>, mpsc::UnboundedReceiver<Notification<T>>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelObserver { sender }, receiver)
}

/// A subscribed observable sequence exposed as a `Stream`.
///
/// Yields `Ok(value)` per emission. An `Err` is terminal: the stream ends
/// after it and the underlying registration is released. Dropping the
/// stream disposes the subscription.
pub struct EventStream<T> {
    receiver: mpsc::UnboundedReceiver<Notification<T>>,
    subscription: Subscription,
    finished: bool,
}

impl<T> EventStream<T> {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<Notification<T>>,
        subscription: Subscription,
    ) -> Self {
        Self {
            receiver,
            subscription,
            finished: false,
        }
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription.id()
    }

    pub fn state(&self) -> SubscriptionState {
        self.subscription.state()
    }

    /// Releases the registration and ends the stream. Idempotent.
    ///
    /// Values still queued are discarded.
    pub fn dispose(&mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.finished = true;
        self.subscription.dispose();
        self.receiver.close();
    }
}

impl<T> Stream for EventStream<T> {
    type Item = Result<T, BridgeError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match this.receiver.poll_recv(cx) {
            Poll::Ready(Some(Notification::Next(value))) => Poll::Ready(Some(Ok(value))),
            Poll::Ready(Some(Notification::Error(error))) => {
                this.finish();
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(Some(Notification::Completed)) | Poll::Ready(None) => {
                this.finish();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("subscription", &self.subscription)
            .field("finished", &self.finished)
            .finish()
    }
}

impl<T> FusedStream for EventStream<T> {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn stream_with_counter() -> (ChannelObserver<u32>, EventStream<u32>, Arc<AtomicUsize>) {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let (observer, receiver) = channel();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (observer, EventStream::new(receiver, subscription), released)
    }

    #[tokio::test]
    async fn yields_values_in_order() {
        let (observer, mut stream, _) = stream_with_counter();

        observer.on_next(1);
        observer.on_next(2);

        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        assert_eq!(stream.next().await.unwrap().unwrap(), 2);
    }

    #[tokio::test]
    async fn error_terminates_and_releases() {
        let (observer, mut stream, released) = stream_with_counter();

        observer.on_error(BridgeError::InvalidArgument("x"));
        observer.on_next(3);

        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
        assert!(stream.is_terminated());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn completion_ends_stream() {
        let (observer, mut stream, released) = stream_with_counter();

        observer.on_completed();

        assert!(stream.next().await.is_none());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dispose_is_idempotent_and_discards_queue() {
        let (observer, mut stream, released) = stream_with_counter();
        observer.on_next(9);

        stream.dispose();
        stream.dispose();

        assert!(stream.next().await.is_none());
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(stream.state(), SubscriptionState::Disposed);
    }

    #[test]
    fn drop_releases_registration() {
        let (_observer, stream, released) = stream_with_counter();
        drop(stream);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
