//! Typed publish/subscribe channel.
//!
//! Each subscriber gets its own unbounded `crossbeam_channel` receiver, so a
//! published event reaches every listener exactly once and slow consumers
//! never block the publisher. Dropped receivers are pruned on the next
//! publish.

use crossbeam_channel::{unbounded, Receiver, Sender};

pub struct EventBus<E> {
    subscribers: Vec<Sender<E>>,
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a new listener
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver one copy of `event` to every live subscriber
    pub fn publish(&mut self, event: E) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
