//! # Registry event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out
//! used by the registry's subscriber listener.
//!
//! ```text
//! Registry ── publish(Event) ──► Bus ──► subscriber listener ──► SubscriberSet
//!                                                          ┌──────────┼──────────┐
//!                                                          ▼          ▼          ▼
//!                                                      LogWriter   Metrics    Custom
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
