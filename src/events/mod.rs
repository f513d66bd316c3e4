//! Registry events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Registry` (suspend state, page re-dispatch),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the registry's subscriber listener (fans out to `SubscriberSet`)
//!   and receivers handed out by `Registry::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
