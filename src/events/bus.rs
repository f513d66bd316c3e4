//! # Registry event bus.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]. The registry publishes
//! [`EventKind::SuspendStateChanged`](super::EventKind::SuspendStateChanged) and
//! re-dispatched page lifecycle events on it; the subscriber listener and any
//! caller of [`Registry::subscribe`](crate::Registry::subscribe) receive them.
//!
//! ```text
//! Registry ───────────────┐
//! page model (main) ──────┼──► Bus ──► subscriber listener ──► SubscriberSet
//! SubscriberSet workers ──┘       └──► Registry::subscribe() receivers
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never fails; with no receivers the event is dropped.
//! - Capacity is shared by all receivers; lagging receivers see `RecvError::Lagged(n)`.
//! - Publishing is safe from synchronous code (no runtime required).

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for registry events.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver observing events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_receivers() {
        let bus = Bus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(Event::suspend_state_changed(true));

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::SuspendStateChanged);
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(4);
        assert_eq!(bus.receiver_count(), 0);
        bus.publish(Event::new(EventKind::Load));
    }
}
