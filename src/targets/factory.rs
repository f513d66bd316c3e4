//! # Capability-gated model factories.
//!
//! The registry owns an ordered list of [`ModelFactory`]s. When a target is created
//! from a [`TargetSpec`], every factory whose [`requires`](ModelFactory::requires)
//! mask is satisfied by the target's capabilities contributes one model, in factory
//! order. A network model only appears on network-capable targets, a DOM model only
//! on DOM-capable ones, and so on.

use std::sync::Arc;

use super::{Capabilities, ModelKind, ModelRef, TargetSpec};

/// Produces one model per qualifying target.
pub trait ModelFactory: Send + Sync + 'static {
    /// Kind of the produced model.
    fn kind(&self) -> ModelKind;

    /// Capabilities the target must have. Default: none (always created).
    fn requires(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Creates the model for the target described by `spec`.
    fn create(&self, spec: &TargetSpec) -> ModelRef;
}

/// Shared handle to a factory.
pub type FactoryRef = Arc<dyn ModelFactory>;

/// Function-backed factory.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use targetvisor::{
///     Capabilities, FactoryFn, FactoryRef, ModelFactory, ModelKind, ModelRef, TargetSpec,
/// };
/// # use targetvisor::{Model, ModelEmitter};
/// # #[derive(Default)] struct Network { emitter: ModelEmitter }
/// # #[async_trait::async_trait]
/// # impl Model for Network {
/// #     fn kind(&self) -> ModelKind { ModelKind::NETWORK }
/// #     fn emitter(&self) -> &ModelEmitter { &self.emitter }
/// # }
///
/// let network: FactoryRef = FactoryFn::arc(
///     ModelKind::NETWORK,
///     Capabilities::NETWORK,
///     |_spec: &TargetSpec| Arc::new(Network::default()) as ModelRef,
/// );
/// assert_eq!(network.requires(), Capabilities::NETWORK);
/// ```
pub struct FactoryFn<F> {
    kind: ModelKind,
    requires: Capabilities,
    f: F,
}

impl<F> FactoryFn<F> {
    pub fn new(kind: ModelKind, requires: Capabilities, f: F) -> Self {
        Self { kind, requires, f }
    }

    /// Creates the factory and returns it as a shared handle.
    pub fn arc(kind: ModelKind, requires: Capabilities, f: F) -> Arc<Self> {
        Arc::new(Self::new(kind, requires, f))
    }
}

impl<F> ModelFactory for FactoryFn<F>
where
    F: Fn(&TargetSpec) -> ModelRef + Send + Sync + 'static,
{
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn requires(&self) -> Capabilities {
        self.requires
    }

    fn create(&self, spec: &TargetSpec) -> ModelRef {
        (self.f)(spec)
    }
}
