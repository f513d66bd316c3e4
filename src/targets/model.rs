//! # Per-target model contract.
//!
//! A [`Model`] is one subsystem instance (runtime, network, DOM, ...) living on a
//! single target. The registry drives two lifecycle hooks:
//!
//! - [`Model::suspend_model`]: **synchronous dispatch**. The registry calls it and
//!   moves on; any asynchronous work the model schedules is not awaited.
//! - [`Model::resume_model`]: **awaited**. The registry resumes all models
//!   concurrently and completes only after every resume future finished.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use targetvisor::{Model, ModelEmitter, ModelError, ModelKind};
//!
//! #[derive(Default)]
//! struct Runtime {
//!     emitter: ModelEmitter,
//! }
//!
//! #[async_trait]
//! impl Model for Runtime {
//!     fn kind(&self) -> ModelKind { ModelKind::RUNTIME }
//!     fn emitter(&self) -> &ModelEmitter { &self.emitter }
//!
//!     async fn resume_model(&self) -> Result<(), ModelError> {
//!         // re-enable the backend domain...
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::ModelEmitter;
use crate::error::ModelError;

/// Tag identifying the kind of a model.
///
/// A target holds at most one model per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelKind(&'static str);

impl ModelKind {
    pub const CONSOLE: ModelKind = ModelKind("console");
    pub const RUNTIME: ModelKind = ModelKind("runtime");
    pub const NETWORK: ModelKind = ModelKind("network");
    /// Page model; the source of page lifecycle events.
    pub const RESOURCE_TREE: ModelKind = ModelKind("resource-tree");
    pub const DEBUGGER: ModelKind = ModelKind("debugger");
    pub const DOM: ModelKind = ModelKind("dom");
    pub const CSS: ModelKind = ModelKind("css");
    pub const WORKER: ModelKind = ModelKind("worker");
    pub const CPU_PROFILER: ModelKind = ModelKind("cpu-profiler");
    pub const HEAP_PROFILER: ModelKind = ModelKind("heap-profiler");
    pub const TRACING: ModelKind = ModelKind("tracing");
    pub const SERVICE_WORKER: ModelKind = ModelKind("service-worker");

    /// Declares a custom model kind.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the kind's name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Event types emitted by the page model and re-dispatched by the registry.
pub mod page_events {
    pub const MAIN_FRAME_NAVIGATED: &str = "MainFrameNavigated";
    pub const LOAD: &str = "Load";
    pub const PAGE_RELOAD_REQUESTED: &str = "PageReloadRequested";
    pub const WILL_RELOAD_PAGE: &str = "WillReloadPage";

    /// All page lifecycle event types, in subscription order.
    pub const ALL: [&str; 4] = [
        MAIN_FRAME_NAVIGATED,
        LOAD,
        PAGE_RELOAD_REQUESTED,
        WILL_RELOAD_PAGE,
    ];
}

/// Page control exposed by page-capable models.
pub trait PageControl: Send + Sync {
    /// Reloads the inspected page.
    fn reload_page(&self, bypass_cache: bool, injected_script: Option<&str>);
}

/// # Per-target subsystem with a suspend/resume lifecycle.
#[async_trait]
pub trait Model: Send + Sync + 'static {
    /// Kind tag; one model per kind per target.
    fn kind(&self) -> ModelKind;

    /// Emitter through which this model publishes its events.
    fn emitter(&self) -> &ModelEmitter;

    /// Suspends the model. Must not block; the registry does not wait for
    /// any work the model schedules internally.
    fn suspend_model(&self) -> Result<(), ModelError> {
        Ok(())
    }

    /// Resumes the model; the registry awaits completion.
    async fn resume_model(&self) -> Result<(), ModelError> {
        Ok(())
    }

    /// Page control, if this model drives the inspected page.
    fn page(&self) -> Option<&dyn PageControl> {
        None
    }
}

/// Shared handle to a model.
pub type ModelRef = Arc<dyn Model>;
