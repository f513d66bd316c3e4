//! # Targets, models and observers.
//!
//! This module provides the data model the registry coordinates:
//! - [`Target`] / [`TargetBuilder`] / [`TargetId`] - a connected debuggee
//! - [`Capabilities`] - subsystem bitmask used for filtering
//! - [`Model`] / [`ModelKind`] - per-target subsystem with suspend/resume hooks
//! - [`ModelEmitter`] / [`ModelEvent`] - typed per-model event dispatch
//! - [`ModelFactory`] / [`FactoryFn`] - capability-gated model creation
//! - [`TargetObserver`] - target add/remove notifications
//! - [`TargetSpec`] - input of `Registry::create_target`

mod capabilities;
mod emitter;
mod factory;
mod model;
mod observer;
mod spec;
mod target;

#[cfg(test)]
pub(crate) mod testing;

pub use capabilities::Capabilities;
pub use emitter::{Listener, ModelEmitter, ModelEvent, ReceiverId};
pub use factory::{FactoryFn, FactoryRef, ModelFactory};
pub use model::{Model, ModelKind, ModelRef, PageControl, page_events};
pub use observer::{ObserverRef, TargetObserver};
pub use spec::TargetSpec;
pub use target::{Target, TargetBuilder, TargetId, Transport};

pub(crate) use emitter::same_listener;
pub(crate) use observer::same_observer;
