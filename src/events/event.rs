//! # Registry-level events.
//!
//! The [`EventKind`] enum classifies events in four groups:
//! - **Suspend state**: the registry flipped its global suspend flag
//! - **Target disposal**: a target was removed and can never be added again
//! - **Page lifecycle**: events of the main target's page model, re-dispatched so
//!   consumers can listen once at the registry instead of per target
//! - **Subscriber health**: a subscriber dropped an event or panicked
//!
//! Target addition is **not** an event: observers are the notification channel
//! for that (see [`TargetObserver`](crate::TargetObserver)).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use targetvisor::{Event, EventKind};
//!
//! let ev = Event::suspend_state_changed(true);
//! assert_eq!(ev.kind, EventKind::SuspendStateChanged);
//! assert_eq!(ev.suspended, Some(true));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::targets::{ModelEvent, TargetId, page_events};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of registry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: `"full"` or `"closed"`
    SubscriberOverflow,

    // === Suspend state ===
    /// Global suspend flag changed.
    ///
    /// Sets:
    /// - `suspended`: new state
    SuspendStateChanged,

    // === Targets ===
    /// A target was removed from the registry and disposed.
    ///
    /// Sets:
    /// - `target`: disposed target
    TargetDisposed,

    // === Page lifecycle (re-dispatched from the main target) ===
    /// Main frame navigated.
    ///
    /// Sets:
    /// - `target`: source target
    /// - `data`: payload of the page model (typically the URL)
    MainFrameNavigated,

    /// Page finished loading. Sets `target`, `data`.
    Load,

    /// A page reload was requested. Sets `target`, `data`.
    PageReloadRequested,

    /// The page is about to reload. Sets `target`, `data`.
    WillReloadPage,
}

impl EventKind {
    /// Maps a page model event type to its registry counterpart.
    pub fn from_page_event(event_type: &str) -> Option<Self> {
        match event_type {
            page_events::MAIN_FRAME_NAVIGATED => Some(EventKind::MainFrameNavigated),
            page_events::LOAD => Some(EventKind::Load),
            page_events::PAGE_RELOAD_REQUESTED => Some(EventKind::PageReloadRequested),
            page_events::WILL_RELOAD_PAGE => Some(EventKind::WillReloadPage),
            _ => None,
        }
    }

    /// True for re-dispatched page lifecycle kinds.
    pub fn is_page_event(self) -> bool {
        matches!(
            self,
            EventKind::MainFrameNavigated
                | EventKind::Load
                | EventKind::PageReloadRequested
                | EventKind::WillReloadPage
        )
    }
}

/// Registry event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Source target of a page lifecycle event.
    pub target: Option<TargetId>,
    /// New suspend state (`SuspendStateChanged` only).
    pub suspended: Option<bool>,
    /// Payload carried over from the source model event.
    pub data: Option<Arc<str>>,
    /// Subscriber name (subscriber health events only).
    pub subscriber: Option<&'static str>,
    /// Human-readable reason (overflow/panic details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            target: None,
            suspended: None,
            data: None,
            subscriber: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    #[inline]
    pub fn with_data(mut self, data: impl Into<Arc<str>>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a suspend state change event.
    #[inline]
    pub fn suspend_state_changed(suspended: bool) -> Self {
        let mut ev = Event::new(EventKind::SuspendStateChanged);
        ev.suspended = Some(suspended);
        ev
    }

    /// Creates a target disposal event.
    #[inline]
    pub fn target_disposed(target: TargetId) -> Self {
        Event::new(EventKind::TargetDisposed).with_target(target)
    }

    /// Converts a page model event into its registry counterpart.
    ///
    /// Returns `None` for event types outside the page lifecycle vocabulary.
    pub fn from_page_event(source: &ModelEvent) -> Option<Self> {
        let kind = EventKind::from_page_event(&source.event_type)?;
        let mut ev = Event::new(kind);
        ev.target = source.target;
        ev.data = source.data.clone();
        Some(ev)
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow).with_reason(reason);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::{ModelEmitter, ModelKind};

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::Load);
        let b = Event::new(EventKind::Load);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_page_event_mapping() {
        for ty in page_events::ALL {
            let kind = EventKind::from_page_event(ty).expect("page event");
            assert!(kind.is_page_event());
        }
        assert_eq!(EventKind::from_page_event("ConsoleCleared"), None);
        assert!(!EventKind::SuspendStateChanged.is_page_event());
    }

    #[test]
    fn test_from_page_event_carries_source() {
        let emitter = ModelEmitter::new();
        emitter.attach(TargetId::from_raw(11), ModelKind::RESOURCE_TREE);

        let source = emitter
            .event(page_events::MAIN_FRAME_NAVIGATED)
            .with_data("https://example.test/");
        let ev = Event::from_page_event(&source).expect("mapped");
        assert_eq!(ev.kind, EventKind::MainFrameNavigated);
        assert_eq!(ev.target, Some(TargetId::from_raw(11)));
        assert_eq!(ev.data.as_deref(), Some("https://example.test/"));

        let other = emitter.event("ExecutionContextCreated");
        assert!(Event::from_page_event(&other).is_none());
    }

    #[test]
    fn test_target_disposed_carries_target() {
        let ev = Event::target_disposed(TargetId::from_raw(4));
        assert_eq!(ev.kind, EventKind::TargetDisposed);
        assert_eq!(ev.target, Some(TargetId::from_raw(4)));
        assert!(!ev.kind.is_page_event());
    }

    #[test]
    fn test_subscriber_events() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.subscriber, Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("full"));
    }
}
