//! In-memory event bus.

use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::bus::{EventBus, Subscription};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("bus lock poisoned")]
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// - No IO; `publish` never waits (unbounded channels)
/// - Fan-out to every live subscription
/// - Closed subscriptions are pruned while publishing
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe and deliver `initial` to the new subscription first.
    ///
    /// Lets a producer hand a late subscriber the current value without
    /// broadcasting it to everyone else.
    pub fn subscribe_seeded(&self, initial: M) -> Subscription<M> {
        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is alive, so this cannot fail.
        let _ = tx.send(initial);
        self.register(tx);
        Subscription::new(rx)
    }

    /// Number of subscriptions that have not been dropped.
    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(subs) => subs.iter().filter(|tx| !tx.is_closed()).count(),
            Err(_) => 0,
        }
    }

    fn register(&self, tx: mpsc::UnboundedSender<M>) {
        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages.
        match self.subscribers.lock() {
            Ok(mut subs) => subs.push(tx),
            Err(_) => tracing::warn!("event bus lock poisoned; subscription will stay silent"),
        }
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.register(tx);
        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscription_receives_each_message() {
        let bus = InMemoryEventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(1u32).unwrap();
        bus.publish(2u32).unwrap();

        assert_eq!(a.recv().await, Some(1));
        assert_eq!(a.recv().await, Some(2));
        assert_eq!(b.recv().await, Some(1));
        assert_eq!(b.recv().await, Some(2));
    }

    #[tokio::test]
    async fn seeded_subscription_sees_initial_value_first() {
        let bus = InMemoryEventBus::new();
        let mut early = bus.subscribe();
        let mut late = bus.subscribe_seeded("current");

        bus.publish("next").unwrap();

        assert_eq!(late.recv().await, Some("current"));
        assert_eq!(late.recv().await, Some("next"));
        assert_eq!(early.recv().await, Some("next"));
        assert!(early.try_recv().is_err());
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let bus = InMemoryEventBus::<u8>::new();
        let keep = bus.subscribe();
        let gone = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(gone);
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(7).unwrap();
        assert_eq!(bus.subscribers.lock().unwrap().len(), 1);
        drop(keep);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn latest_drains_buffer() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe();
        assert_eq!(sub.latest(), None);

        for n in 0..5u8 {
            bus.publish(n).unwrap();
        }
        assert_eq!(sub.latest(), Some(4));
        assert!(sub.try_recv().is_err());
    }
}
