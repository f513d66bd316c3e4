//! # Target specification for registry-created targets.

use std::sync::{Arc, Weak};

use super::{Capabilities, Target, Transport};

/// Everything a lifecycle producer knows about a freshly connected debuggee.
///
/// Passed to [`Registry::create_target`](crate::Registry::create_target), which
/// instantiates the capability-gated models and registers the target atomically.
///
/// ## Example
/// ```rust
/// use targetvisor::{Capabilities, TargetSpec};
///
/// let spec = TargetSpec::new("page", Capabilities::DOM | Capabilities::JS);
/// assert_eq!(spec.name(), "page");
/// assert!(spec.parent().is_none());
/// ```
#[derive(Clone)]
pub struct TargetSpec {
    name: String,
    capabilities: Capabilities,
    parent: Option<Weak<Target>>,
    transport: Option<Transport>,
}

impl TargetSpec {
    pub fn new(name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            capabilities,
            parent: None,
            transport: None,
        }
    }

    /// Returns a new spec with the given parent (held weakly).
    pub fn with_parent(mut self, parent: &Arc<Target>) -> Self {
        self.parent = Some(Arc::downgrade(parent));
        self
    }

    /// Returns a new spec with the given transport handle.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Parent target, if set and still alive.
    pub fn parent(&self) -> Option<Arc<Target>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn transport(&self) -> Option<&Transport> {
        self.transport.as_ref()
    }

    pub(crate) fn parent_weak(&self) -> Option<Weak<Target>> {
        self.parent.clone()
    }
}
