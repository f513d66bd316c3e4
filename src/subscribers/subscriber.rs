//! # Registry event subscriber trait.
//!
//! [`Subscribe`] is the asynchronous extension point for registry-level events
//! (suspend state changes, re-dispatched page lifecycle). It complements the
//! synchronous [`TargetObserver`](crate::TargetObserver), which is reserved for
//! target add/remove.
//!
//! Each subscriber gets:
//! - **Dedicated worker task**
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::SubscriberPanicked`)
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use targetvisor::{Event, EventKind, Subscribe};
//!
//! struct ReloadCounter;
//!
//! #[async_trait]
//! impl Subscribe for ReloadCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::WillReloadPage) {
//!             // bump a counter, invalidate caches, ...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "reload-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Registry event subscriber.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this subscriber's queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event. Events arrive in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs and overflow/panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity (clamped to a minimum of 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
