//! Registry core: target bookkeeping, observers, listener replay and suspend/resume.
//!
//! The public API from this module is [`Registry`] (built through
//! [`RegistryBuilder`]) plus its [`Config`] and the [`LifecycleReport`] returned by
//! suspend/resume passes.
//!
//! Internal modules:
//! - [`registry`]: ordered target list, observer side table, recorded bindings;
//! - [`builder`]: wires bus, subscribers and factories;
//! - [`report`]: per-model failures of a suspend/resume pass.

mod builder;
mod config;
mod registry;
mod report;

pub use builder::RegistryBuilder;
pub use config::Config;
pub use registry::Registry;
pub use report::{LifecyclePhase, LifecycleReport, ModelFailure};
