//! # Target lifecycle observer.
//!
//! Observers register with [`Registry::observe_targets`](crate::Registry::observe_targets)
//! together with a capability mask. The registry keeps the mask in its own side
//! table; the observer object is never mutated.
//!
//! ## Rules
//! - Callbacks are synchronous and run on the caller's thread, after the registry
//!   released its internal lock; they may call back into the registry.
//! - Observers are notified in registration order.
//! - Identity is the `Arc` data pointer: registering the same instance twice fails.

use std::sync::Arc;

use super::Target;

/// Receives target add/remove notifications.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use targetvisor::{Target, TargetObserver};
///
/// struct ConsolePanel;
///
/// impl TargetObserver for ConsolePanel {
///     fn target_added(&self, target: &Arc<Target>) {
///         println!("attach console to {}", target.name());
///     }
///     fn target_removed(&self, target: &Arc<Target>) {
///         println!("detach console from {}", target.name());
///     }
///     fn name(&self) -> &'static str { "console-panel" }
/// }
/// ```
pub trait TargetObserver: Send + Sync + 'static {
    fn target_added(&self, target: &Arc<Target>);

    fn target_removed(&self, target: &Arc<Target>);

    /// Name used in logs and errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to an observer.
pub type ObserverRef = Arc<dyn TargetObserver>;

#[inline]
pub(crate) fn same_observer(a: &ObserverRef, b: &ObserverRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
