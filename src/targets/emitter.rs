//! # Per-model event emitter.
//!
//! Every [`Model`](crate::Model) owns a [`ModelEmitter`]. Listeners are attached per
//! event type and invoked synchronously, in insertion order, when the model
//! dispatches a [`ModelEvent`].
//!
//! ## Rules
//! - The same `(listener, receiver)` pair may be added more than once; each entry fires.
//! - `remove_listener` drops **every** entry matching `(event_type, listener, receiver)`.
//! - Listeners run outside the internal lock, so they may add/remove listeners
//!   (or call back into the registry) while being dispatched.
//! - Listener identity is the `Arc` data pointer, not the closure's behavior.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::{ModelKind, TargetId};

static RECEIVER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Callback invoked for model events.
pub type Listener = Arc<dyn Fn(&ModelEvent) + Send + Sync>;

/// Opaque token scoping a listener binding.
///
/// Two bindings with the same callback but different receivers are tracked
/// (and removed) independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

impl ReceiverId {
    /// Allocates a fresh process-unique receiver id.
    pub fn next() -> Self {
        Self(RECEIVER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Typed event emitted by a model.
#[derive(Debug, Clone)]
pub struct ModelEvent {
    /// Event type (e.g. `"Load"`), matched against listener registrations.
    pub event_type: Arc<str>,
    /// Target owning the emitting model (`None` if the model was never attached).
    pub target: Option<TargetId>,
    /// Kind of the emitting model.
    pub model: Option<ModelKind>,
    /// Optional payload (URL, message text, ...).
    pub data: Option<Arc<str>>,
}

impl ModelEvent {
    /// Attaches a payload.
    #[inline]
    pub fn with_data(mut self, data: impl Into<Arc<str>>) -> Self {
        self.data = Some(data.into());
        self
    }
}

struct Entry {
    event_type: Arc<str>,
    listener: Listener,
    receiver: Option<ReceiverId>,
}

impl Entry {
    fn matches(&self, event_type: &str, listener: &Listener, receiver: Option<ReceiverId>) -> bool {
        &*self.event_type == event_type
            && same_listener(&self.listener, listener)
            && self.receiver == receiver
    }
}

/// Event listener set owned by a single model.
#[derive(Default)]
pub struct ModelEmitter {
    source: OnceLock<(TargetId, ModelKind)>,
    entries: Mutex<Vec<Entry>>,
}

impl ModelEmitter {
    /// Creates an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the emitter to the target that owns its model.
    ///
    /// A model belongs to exactly one target: returns `false` (and keeps the
    /// first owner) if the emitter was already bound.
    pub(crate) fn attach(&self, target: TargetId, kind: ModelKind) -> bool {
        self.source.set((target, kind)).is_ok()
    }

    /// Target owning the emitting model, once attached.
    pub fn owner(&self) -> Option<TargetId> {
        self.source.get().map(|(t, _)| *t)
    }

    /// Adds a listener for `event_type`.
    pub fn add_listener(
        &self,
        event_type: impl Into<Arc<str>>,
        listener: Listener,
        receiver: Option<ReceiverId>,
    ) {
        self.entries.lock().push(Entry {
            event_type: event_type.into(),
            listener,
            receiver,
        });
    }

    /// Removes every matching listener; returns how many were removed.
    pub fn remove_listener(
        &self,
        event_type: &str,
        listener: &Listener,
        receiver: Option<ReceiverId>,
    ) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| !e.matches(event_type, listener, receiver));
        before - entries.len()
    }

    /// True if at least one listener is attached for `event_type`.
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|e| &*e.event_type == event_type)
    }

    /// Total number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Builds an event stamped with this emitter's source.
    pub fn event(&self, event_type: impl Into<Arc<str>>) -> ModelEvent {
        let source = self.source.get().copied();
        ModelEvent {
            event_type: event_type.into(),
            target: source.map(|(t, _)| t),
            model: source.map(|(_, k)| k),
            data: None,
        }
    }

    /// Shorthand for building an event with [`event`](Self::event) and dispatching it.
    pub fn emit(&self, event_type: impl Into<Arc<str>>, data: Option<Arc<str>>) {
        let mut ev = self.event(event_type);
        ev.data = data;
        self.dispatch(&ev);
    }

    /// Invokes every listener registered for the event's type.
    pub fn dispatch(&self, event: &ModelEvent) {
        let snapshot: Vec<Listener> = self
            .entries
            .lock()
            .iter()
            .filter(|e| e.event_type == event.event_type)
            .map(|e| Arc::clone(&e.listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }
}

#[inline]
pub(crate) fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, Listener) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let listener: Listener = Arc::new(move |_ev: &ModelEvent| {
            h.fetch_add(1, AtomicOrdering::SeqCst);
        });
        (hits, listener)
    }

    #[test]
    fn test_dispatch_only_matching_type() {
        let emitter = ModelEmitter::new();
        let (hits, l) = counter();
        emitter.add_listener("Load", l, None);

        emitter.emit("Load", None);
        emitter.emit("Other", None);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_remove_respects_receiver() {
        let emitter = ModelEmitter::new();
        let (hits, l) = counter();
        let a = ReceiverId::next();
        let b = ReceiverId::next();
        emitter.add_listener("Load", Arc::clone(&l), Some(a));
        emitter.add_listener("Load", Arc::clone(&l), Some(b));

        assert_eq!(emitter.remove_listener("Load", &l, Some(a)), 1);
        emitter.emit("Load", None);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);

        assert_eq!(emitter.remove_listener("Load", &l, None), 0);
        assert_eq!(emitter.listener_count(), 1);
    }

    #[test]
    fn test_duplicates_fire_and_are_removed_together() {
        let emitter = ModelEmitter::new();
        let (hits, l) = counter();
        emitter.add_listener("Load", Arc::clone(&l), None);
        emitter.add_listener("Load", Arc::clone(&l), None);

        emitter.emit("Load", None);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 2);

        assert_eq!(emitter.remove_listener("Load", &l, None), 2);
        assert!(!emitter.has_listeners("Load"));
    }

    #[test]
    fn test_listener_may_reenter_emitter() {
        let emitter = Arc::new(ModelEmitter::new());
        let (hits, inner) = counter();
        let em = Arc::clone(&emitter);
        let outer: Listener = Arc::new(move |_ev: &ModelEvent| {
            em.add_listener("Load", Arc::clone(&inner), None);
        });
        emitter.add_listener("Load", outer, None);

        emitter.emit("Load", None);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 0);
        emitter.emit("Load", None);
        assert_eq!(hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_attach_stamps_events_once() {
        let emitter = ModelEmitter::new();
        assert_eq!(emitter.owner(), None);
        assert!(emitter.attach(TargetId::from_raw(5), ModelKind::RUNTIME));
        assert!(!emitter.attach(TargetId::from_raw(6), ModelKind::NETWORK));
        assert_eq!(emitter.owner(), Some(TargetId::from_raw(5)));

        let ev = emitter.event("Foo").with_data("x");
        assert_eq!(ev.target, Some(TargetId::from_raw(5)));
        assert_eq!(ev.model, Some(ModelKind::RUNTIME));
        assert_eq!(ev.data.as_deref(), Some("x"));
    }
}
