//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **event bus pattern**: a pub/sub mechanism for
//! distributing messages to multiple consumers (the session controller's
//! listener, views re-rendering on session changes, etc.).
//!
//! ## Delivery
//!
//! - **Broadcast**: every live subscription receives a copy of each message.
//! - **Ordered per publisher**: a subscription observes messages in the order a
//!   single publisher sent them.
//! - **No persistence**: a subscription only sees messages published after it
//!   was created (unless the bus seeds it explicitly).
//!
//! Dropping a [`Subscription`] unregisters it; the bus prunes closed
//! subscribers on the next publish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};
use tokio::time::error::Elapsed;

/// A subscription to a message stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let mut subscription = bus.subscribe();
///
/// while let Some(message) = subscription.recv().await {
///     process(message);
/// }
/// // `None`: the bus was dropped.
/// ```
///
/// Subscriptions are designed for a single consumer task.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: UnboundedReceiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: UnboundedReceiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<M> {
        self.receiver.recv().await
    }

    /// Try to receive a message without waiting.
    pub fn try_recv(&mut self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Wait up to `timeout` for the next message.
    ///
    /// `Ok(None)` means the bus is gone.
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<M>, Elapsed> {
        tokio::time::timeout(timeout, self.receiver.recv()).await
    }

    /// Drain everything currently buffered, returning the most recent message.
    pub fn latest(&mut self) -> Option<M> {
        let mut last = None;
        while let Ok(message) = self.receiver.try_recv() {
            last = Some(message);
        }
        last
    }
}

/// Domain-agnostic message bus (pub/sub abstraction).
///
/// `publish()` can fail (e.g. internal lock poisoning); failures are surfaced to
/// the caller, which decides whether the failure is fatal.
///
/// The trait requires `Send + Sync` so a bus can be shared between the task
/// that publishes and the tasks that subscribe.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
