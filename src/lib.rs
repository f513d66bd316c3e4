//! # targetvisor
//!
//! **Targetvisor** is a registry of debugging targets for tooling front-ends.
//!
//! It keeps the canonical, ordered list of connected debuggees (pages, workers,
//! browsers), tells capability-filtered observers when targets come and go, replays
//! recorded model listeners onto every matching model, and coordinates a global
//! suspend/resume of all per-target models.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Target    │   │    Target    │   │    Target    │
//!     │ (page, DOM)  │   │ (worker, JS) │   │  (browser)   │
//!     │  └ models    │   │  └ models    │   │  └ models    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry                                                         │
//! │  - ordered targets (first = main target)                          │
//! │  - observers + capability masks (side table)                      │
//! │  - recorded model listener bindings                               │
//! │  - global suspend flag                                            │
//! │  - Bus (broadcast events)                                         │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!  TargetObserver     ModelEmitter       Model hooks           │
//!  target_added /     add_listener /     suspend_model /       │
//!  target_removed     remove_listener    resume_model          │
//!                                                              ▼
//!                                        SuspendStateChanged, page lifecycle
//!                                                              │
//!                                                              ▼
//!                                          ┌────────────────────────┐
//!                                          │  subscriber listener   │
//!                                          └───┬────────────────┬───┘
//!                                              ▼                ▼
//!                                       SubscriberSet    Registry::subscribe()
//!                                     (per-sub queues)      receivers
//! ```
//!
//! ### Lifecycle
//! ```text
//! create_target(spec) ─► factories gated by capabilities ─► TargetBuilder::build()
//!                                                                   │
//! add_target(t) ◄───────────────────────────────────────────────────┘
//!   ├─► observers whose mask ⊆ t.capabilities ─► target_added(t)
//!   └─► bindings ─► t.model(kind).emitter().add_listener(..)
//!
//! suspend_all_targets() ─► SuspendStateChanged(true)  ─► suspend_model() (dispatched)
//! resume_all_targets()  ─► SuspendStateChanged(false) ─► resume_model()  (awaited, concurrent)
//!
//! remove_target(t)
//!   ├─► t disposed
//!   ├─► target_removed(t)
//!   └─► bindings detached from t's models
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Registry**      | Ordered targets, observers, listener replay, suspend/resume. | [`Registry`], [`RegistryBuilder`]           |
//! | **Targets**       | Debuggees with capabilities and per-kind models.             | [`Target`], [`Capabilities`], [`Model`]     |
//! | **Observers**     | Capability-filtered add/remove notifications.                | [`TargetObserver`]                          |
//! | **Model events**  | Typed per-model listeners.                                   | [`ModelEmitter`], [`ModelEvent`]            |
//! | **Factories**     | Capability-gated model creation.                             | [`ModelFactory`], [`FactoryFn`]             |
//! | **Subscriber API**| Hook into registry events.                                   | [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed errors for registry operations and model hooks.        | [`RegistryError`], [`ModelError`]           |
//! | **Configuration** | Centralize registry settings.                                | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use targetvisor::{Capabilities, Config, Registry, Target, TargetObserver};
//!
//! struct Panel;
//!
//! impl TargetObserver for Panel {
//!     fn target_added(&self, target: &Arc<Target>) {
//!         println!("attached to {}", target.name());
//!     }
//!     fn target_removed(&self, target: &Arc<Target>) {
//!         println!("detached from {}", target.name());
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn targetvisor::Subscribe>> = {
//!         use targetvisor::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn targetvisor::Subscribe>> = Vec::new();
//!
//!     let registry = Registry::builder(Config::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     // Only DOM-capable targets reach this panel.
//!     registry.observe_targets(Arc::new(Panel), Capabilities::DOM)?;
//!
//!     let page = Target::builder("page", Capabilities::DOM | Capabilities::JS).build();
//!     registry.add_target(Arc::clone(&page))?;
//!
//!     registry.suspend_all_targets();
//!     let report = registry.resume_all_targets().await?;
//!     assert!(report.is_ok());
//!
//!     registry.remove_target(&page);
//!     registry.shutdown().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;
mod targets;

// ---- Public re-exports ----

pub use core::{Config, LifecyclePhase, LifecycleReport, ModelFailure, Registry, RegistryBuilder};
pub use error::{ModelError, RegistryError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use targets::{
    Capabilities, FactoryFn, FactoryRef, Listener, Model, ModelEmitter, ModelEvent, ModelFactory,
    ModelKind, ModelRef, ObserverRef, PageControl, ReceiverId, Target, TargetBuilder, TargetId,
    TargetObserver, TargetSpec, Transport, page_events,
};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
