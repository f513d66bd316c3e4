//! # Debugging target.
//!
//! A [`Target`] is one connected debuggee (page, worker, browser). Its identity,
//! name and capabilities are fixed at construction; its models are attached once by
//! [`TargetBuilder::build`] and never change afterwards.
//!
//! ## Example
//! ```rust
//! use targetvisor::{Capabilities, Target};
//!
//! let page = Target::builder("page", Capabilities::DOM | Capabilities::JS).build();
//! let worker = Target::builder("worker", Capabilities::JS)
//!     .with_parent(&page)
//!     .build();
//!
//! assert!(page.has_all_capabilities(Capabilities::DOM));
//! assert_eq!(worker.parent().map(|p| p.id()), Some(page.id()));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

use tracing::warn;

use super::{Capabilities, Model, ModelKind, ModelRef};

/// Global target id counter; ids are never reused.
static TARGET_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique target identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(u64);

impl TargetId {
    fn next() -> Self {
        Self(TARGET_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Wraps a raw id (lookups, tests).
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque transport handle carried by a target.
pub type Transport = Arc<dyn Any + Send + Sync>;

/// A connected debuggee tracked by the registry.
pub struct Target {
    id: TargetId,
    name: String,
    capabilities: Capabilities,
    models: Vec<ModelRef>,
    parent: Option<Weak<Target>>,
    transport: Option<Transport>,
    disposed: AtomicBool,
}

impl Target {
    /// Starts building a target.
    pub fn builder(name: impl Into<String>, capabilities: Capabilities) -> TargetBuilder {
        TargetBuilder::new(name, capabilities)
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// True if the target has every capability in `mask`.
    #[inline]
    pub fn has_all_capabilities(&self, mask: Capabilities) -> bool {
        self.capabilities.satisfies(mask)
    }

    /// Models in attachment order.
    pub fn models(&self) -> &[ModelRef] {
        &self.models
    }

    /// Returns the model of the given kind, if present.
    pub fn model(&self, kind: ModelKind) -> Option<&ModelRef> {
        self.models.iter().find(|m| m.kind() == kind)
    }

    /// Parent target, if it is still alive.
    pub fn parent(&self) -> Option<Arc<Target>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Returns the transport handle downcast to `T`.
    pub fn transport<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.transport
            .as_ref()
            .and_then(|t| Arc::clone(t).downcast::<T>().ok())
    }

    /// True once the registry removed this target.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(AtomicOrdering::Acquire)
    }

    pub(crate) fn dispose(&self) {
        self.disposed.store(true, AtomicOrdering::Release);
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field(
                "models",
                &self.models.iter().map(|m| m.kind()).collect::<Vec<_>>(),
            )
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Builder for [`Target`].
pub struct TargetBuilder {
    name: String,
    capabilities: Capabilities,
    models: Vec<ModelRef>,
    parent: Option<Weak<Target>>,
    transport: Option<Transport>,
}

impl TargetBuilder {
    pub fn new(name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            capabilities,
            models: Vec::new(),
            parent: None,
            transport: None,
        }
    }

    /// Adds a model. A second model of the same kind replaces the first in place.
    pub fn with_model(mut self, model: ModelRef) -> Self {
        let kind = model.kind();
        match self.models.iter_mut().find(|m| m.kind() == kind) {
            Some(slot) => *slot = model,
            None => self.models.push(model),
        }
        self
    }

    /// Sets the parent target (held weakly).
    pub fn with_parent(mut self, parent: &Arc<Target>) -> Self {
        self.parent = Some(Arc::downgrade(parent));
        self
    }

    pub(crate) fn with_parent_weak(mut self, parent: Option<Weak<Target>>) -> Self {
        self.parent = parent;
        self
    }

    /// Sets the transport handle.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Allocates an id and binds every model's emitter to it.
    ///
    /// A model already built into another target keeps its first owner; the
    /// registry refuses to add a target holding such a model.
    pub fn build(self) -> Arc<Target> {
        let id = TargetId::next();
        for model in &self.models {
            if !model.emitter().attach(id, model.kind()) {
                warn!(
                    target_id = %id,
                    model = %model.kind(),
                    owner = ?model.emitter().owner().map(TargetId::as_u64),
                    "model already belongs to another target"
                );
            }
        }
        Arc::new(Target {
            id,
            name: self.name,
            capabilities: self.capabilities,
            models: self.models,
            parent: self.parent,
            transport: self.transport,
            disposed: AtomicBool::new(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::testing::RecordingModel;

    #[test]
    fn test_ids_are_unique() {
        let a = Target::builder("a", Capabilities::empty()).build();
        let b = Target::builder("b", Capabilities::empty()).build();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_same_kind_replaces_in_place() {
        let first = RecordingModel::arc(ModelKind::RUNTIME);
        let net = RecordingModel::arc(ModelKind::NETWORK);
        let second = RecordingModel::arc(ModelKind::RUNTIME);

        let t = Target::builder("t", Capabilities::JS)
            .with_model(first)
            .with_model(net)
            .with_model(second.clone())
            .build();

        let kinds: Vec<_> = t.models().iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![ModelKind::RUNTIME, ModelKind::NETWORK]);
        let runtime = t.model(ModelKind::RUNTIME).expect("runtime model");
        assert!(std::ptr::addr_eq(Arc::as_ptr(runtime), Arc::as_ptr(&second)));
    }

    #[test]
    fn test_parent_is_weak() {
        let parent = Target::builder("page", Capabilities::DOM).build();
        let child = Target::builder("frame", Capabilities::DOM)
            .with_parent(&parent)
            .build();
        assert!(child.parent().is_some());
        drop(parent);
        assert!(child.parent().is_none());
    }

    #[test]
    fn test_transport_downcast() {
        struct Socket(u16);
        let t = Target::builder("t", Capabilities::empty())
            .with_transport(Arc::new(Socket(9222)))
            .build();
        assert_eq!(t.transport::<Socket>().map(|s| s.0), Some(9222));
        assert!(t.transport::<String>().is_none());
    }

    #[test]
    fn test_shared_model_keeps_first_owner() {
        let model = RecordingModel::arc(ModelKind::RESOURCE_TREE);
        let a = Target::builder("a", Capabilities::DOM)
            .with_model(model.clone())
            .build();
        let _b = Target::builder("b", Capabilities::DOM)
            .with_model(model.clone())
            .build();
        assert_eq!(model.emitter().owner(), Some(a.id()));
    }

    #[test]
    fn test_build_attaches_emitters() {
        let model = RecordingModel::arc(ModelKind::RUNTIME);
        let t = Target::builder("t", Capabilities::JS)
            .with_model(model.clone())
            .build();
        let ev = model.emitter().event("Foo");
        assert_eq!(ev.target, Some(t.id()));
        assert_eq!(ev.model, Some(ModelKind::RUNTIME));
    }
}
