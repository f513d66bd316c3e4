//! # Target registry.
//!
//! [`Registry`] owns the canonical, ordered list of targets and coordinates
//! everything that spans targets:
//!
//! ```text
//! add_target(t)
//!   ├─► push t                                    (under lock)
//!   ├─► first target? ─► attach page re-dispatch  (page model ─► Bus, under lock)
//!   ├─► observers with t ⊇ mask ─► target_added   (registration order)
//!   └─► bindings still recorded ─► t.model(kind).emitter().add_listener(..)  (under lock)
//!
//! remove_target(t)
//!   ├─► remove t, mark disposed                   (under lock)
//!   ├─► t was the page source? ─► detach, move to new main target (if any)
//!   ├─► recorded bindings ─► remove_listener(..) on t's models
//!   ├─► TargetDisposed ─► Bus
//!   └─► observers with t ⊇ mask ─► target_removed (registration order)
//!
//! suspend_all_targets()  ─► flag ─► SuspendStateChanged ─► suspend_model() in order
//! resume_all_targets()   ─► flag ─► SuspendStateChanged ─► join_all(resume_model())
//! ```
//!
//! ## Rules
//! - All state lives behind one mutex. Emitter listeners (page re-dispatch and
//!   recorded bindings) are attached and detached while it is held; no user code
//!   runs there.
//! - Observer and listener callbacks run after the lock is released, so they may
//!   call back into the registry. A binding an observer removes from inside
//!   `target_added` is not applied to that target.
//! - When the same target is added and removed concurrently from different
//!   threads, observers may see `target_removed` before `target_added`; the
//!   listener state is consistent either way.
//! - Capability filtering is evaluated on every call; nothing is cached.
//! - Removing absent targets, observers or bindings is a no-op.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::config::Config;
use super::report::{LifecyclePhase, LifecycleReport, ModelFailure};
use crate::error::RegistryError;
use crate::events::{Bus, Event};
use crate::targets::{
    Capabilities, FactoryRef, Listener, Model, ModelEvent, ModelKind, ObserverRef, ReceiverId,
    Target, TargetBuilder, TargetId, TargetSpec, page_events, same_listener, same_observer,
};

/// Observer plus the mask it registered with.
struct ObserverEntry {
    observer: ObserverRef,
    mask: Capabilities,
}

/// Recorded model listener binding, replayed onto targets as they come and go.
struct Binding {
    id: u64,
    kind: ModelKind,
    event_type: Arc<str>,
    listener: Listener,
    receiver: Option<ReceiverId>,
}

impl Binding {
    fn matches(
        &self,
        kind: ModelKind,
        event_type: &str,
        listener: &Listener,
        receiver: Option<ReceiverId>,
    ) -> bool {
        self.kind == kind
            && &*self.event_type == event_type
            && same_listener(&self.listener, listener)
            && self.receiver == receiver
    }

    fn apply(&self, target: &Target) {
        if let Some(model) = target.model(self.kind) {
            model.emitter().add_listener(
                Arc::clone(&self.event_type),
                Arc::clone(&self.listener),
                self.receiver,
            );
        }
    }

    fn revoke(&self, target: &Target) {
        if let Some(model) = target.model(self.kind) {
            model
                .emitter()
                .remove_listener(&self.event_type, &self.listener, self.receiver);
        }
    }
}

#[derive(Default)]
struct State {
    targets: Vec<Arc<Target>>,
    observers: Vec<ObserverEntry>,
    bindings: Vec<Binding>,
    suspended: bool,
    /// Target whose page model currently feeds the bus.
    page_source: Option<Arc<Target>>,
    next_binding: u64,
}

impl State {
    fn next_binding_id(&mut self) -> u64 {
        self.next_binding += 1;
        self.next_binding
    }

    fn contains(&self, target: &Target) -> bool {
        self.targets.iter().any(|t| t.id() == target.id())
    }

    fn observers_for(&self, target: &Target) -> Vec<ObserverRef> {
        self.observers
            .iter()
            .filter(|e| target.has_all_capabilities(e.mask))
            .map(|e| Arc::clone(&e.observer))
            .collect()
    }

    fn matching(&self, mask: Capabilities) -> Vec<Arc<Target>> {
        self.targets
            .iter()
            .filter(|t| t.has_all_capabilities(mask))
            .cloned()
            .collect()
    }
}

/// Registry of debugging targets.
///
/// Construct with [`Registry::builder`] (or [`Registry::new`] for the defaults).
/// There is no global instance: share the returned `Arc` with consumers.
pub struct Registry {
    cfg: Config,
    state: Mutex<State>,
    factories: Vec<FactoryRef>,
    bus: Bus,
    /// Forwards page model events to the bus; stable identity for attach/detach.
    page_listener: Listener,
    runtime_token: CancellationToken,
    subscriber_listener: Mutex<Option<JoinHandle<()>>>,
}

impl Registry {
    /// Creates a registry with the given configuration, no factories and no subscribers.
    pub fn new(cfg: Config) -> Arc<Self> {
        Self::builder(cfg).build()
    }

    /// Starts building a registry.
    pub fn builder(cfg: Config) -> super::RegistryBuilder {
        super::RegistryBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        factories: Vec<FactoryRef>,
        bus: Bus,
        runtime_token: CancellationToken,
        subscriber_listener: Option<JoinHandle<()>>,
    ) -> Self {
        let page_bus = bus.clone();
        let page_listener: Listener = Arc::new(move |ev: &ModelEvent| {
            if let Some(event) = Event::from_page_event(ev) {
                page_bus.publish(event);
            }
        });

        Self {
            cfg,
            state: Mutex::new(State::default()),
            factories,
            bus,
            page_listener,
            runtime_token,
            subscriber_listener: Mutex::new(subscriber_listener),
        }
    }

    // ---------------------------
    // Targets
    // ---------------------------

    /// Builds a target from `spec` with every qualifying factory model and adds it.
    ///
    /// Factories run in registration order; a factory contributes only if the
    /// target's capabilities include everything it [`requires`](crate::ModelFactory::requires).
    pub fn create_target(&self, spec: TargetSpec) -> Result<Arc<Target>, RegistryError> {
        let mut builder = TargetBuilder::new(spec.name(), spec.capabilities())
            .with_parent_weak(spec.parent_weak());
        if let Some(transport) = spec.transport() {
            builder = builder.with_transport(Arc::clone(transport));
        }

        for factory in &self.factories {
            if !spec.capabilities().satisfies(factory.requires()) {
                continue;
            }
            let model = factory.create(&spec);
            if model.kind() != factory.kind() {
                warn!(
                    expected = %factory.kind(),
                    actual = %model.kind(),
                    "factory produced a model of an unexpected kind"
                );
            }
            builder = builder.with_model(model);
        }

        let target = builder.build();
        self.add_target(Arc::clone(&target))?;
        Ok(target)
    }

    /// Registers a target.
    ///
    /// Fails with [`RegistryError::DuplicateTarget`] if it is already registered,
    /// with [`RegistryError::TargetDisposed`] if it was removed before and with
    /// [`RegistryError::ModelAlreadyOwned`] if one of its models was built into
    /// another target.
    pub fn add_target(&self, target: Arc<Target>) -> Result<(), RegistryError> {
        let (observers, pending) = {
            let mut st = self.state.lock();
            if target.is_disposed() {
                return Err(RegistryError::TargetDisposed { id: target.id() });
            }
            if st.contains(&target) {
                return Err(RegistryError::DuplicateTarget { id: target.id() });
            }
            if let Some(model) = target
                .models()
                .iter()
                .find(|m| m.emitter().owner() != Some(target.id()))
            {
                return Err(RegistryError::ModelAlreadyOwned {
                    id: target.id(),
                    model: model.kind(),
                });
            }
            st.targets.push(Arc::clone(&target));

            if st.targets.len() == 1 && st.page_source.is_none() {
                st.page_source = Some(Arc::clone(&target));
                self.attach_page_listener(&target);
            }
            let pending: Vec<u64> = st.bindings.iter().map(|b| b.id).collect();
            (st.observers_for(&target), pending)
        };

        debug!(
            target_id = %target.id(),
            name = target.name(),
            capabilities = target.capabilities().bits(),
            models = target.models().len(),
            "target added"
        );

        for observer in observers {
            observer.target_added(&target);
        }

        // Bindings added meanwhile were applied by add_model_listener already.
        let st = self.state.lock();
        if st.contains(&target) {
            for binding in st.bindings.iter().filter(|b| pending.contains(&b.id)) {
                binding.apply(&target);
            }
        }
        Ok(())
    }

    /// Unregisters a target; no-op if it is not registered.
    ///
    /// The target is disposed and can never be added again;
    /// [`EventKind::TargetDisposed`](crate::EventKind::TargetDisposed) is published.
    pub fn remove_target(&self, target: &Arc<Target>) {
        let observers = {
            let mut st = self.state.lock();
            let Some(pos) = st.targets.iter().position(|t| t.id() == target.id()) else {
                return;
            };
            st.targets.remove(pos);
            target.dispose();

            let was_source = st
                .page_source
                .as_ref()
                .is_some_and(|s| s.id() == target.id());
            if was_source {
                self.detach_page_listener(target);
                st.page_source = st.targets.first().cloned();
                if let Some(next) = &st.page_source {
                    self.attach_page_listener(next);
                }
            }
            for binding in &st.bindings {
                binding.revoke(target);
            }
            st.observers_for(target)
        };

        debug!(target_id = %target.id(), name = target.name(), "target removed");
        self.bus.publish(Event::target_disposed(target.id()));

        for observer in observers {
            observer.target_removed(target);
        }
    }

    /// Snapshot of registered targets having every capability in `mask`,
    /// in registration order. `None` returns all targets.
    pub fn targets(&self, mask: Option<Capabilities>) -> Vec<Arc<Target>> {
        let st = self.state.lock();
        match mask {
            None => st.targets.clone(),
            Some(mask) => st.matching(mask),
        }
    }

    pub fn target_by_id(&self, id: TargetId) -> Option<Arc<Target>> {
        self.state
            .lock()
            .targets
            .iter()
            .find(|t| t.id() == id)
            .cloned()
    }

    /// First registered target still present.
    pub fn main_target(&self) -> Option<Arc<Target>> {
        self.state.lock().targets.first().cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().targets.is_empty()
    }

    // ---------------------------
    // Observers
    // ---------------------------

    /// Registers `observer` for targets having every capability in `mask`
    /// (`Capabilities::empty()` observes all targets).
    ///
    /// `target_added` is invoked synchronously for every matching target that is
    /// already registered before this call returns.
    pub fn observe_targets(
        &self,
        observer: ObserverRef,
        mask: Capabilities,
    ) -> Result<(), RegistryError> {
        let existing = {
            let mut st = self.state.lock();
            if st
                .observers
                .iter()
                .any(|e| same_observer(&e.observer, &observer))
            {
                return Err(RegistryError::DuplicateObserver {
                    observer: observer.name(),
                });
            }
            st.observers.push(ObserverEntry {
                observer: Arc::clone(&observer),
                mask,
            });
            st.matching(mask)
        };

        trace!(
            observer = observer.name(),
            mask = mask.bits(),
            existing = existing.len(),
            "observer registered"
        );
        for target in &existing {
            observer.target_added(target);
        }
        Ok(())
    }

    /// Unregisters `observer`; no-op if it is not registered.
    pub fn unobserve_targets(&self, observer: &ObserverRef) {
        let mut st = self.state.lock();
        st.observers.retain(|e| !same_observer(&e.observer, observer));
    }

    // ---------------------------
    // Model listeners
    // ---------------------------

    /// Records a listener binding and attaches it to the `kind` model of every
    /// current target. Targets added later get it on registration.
    pub fn add_model_listener(
        &self,
        kind: ModelKind,
        event_type: impl Into<Arc<str>>,
        listener: Listener,
        receiver: Option<ReceiverId>,
    ) {
        let mut st = self.state.lock();
        let binding = Binding {
            id: st.next_binding_id(),
            kind,
            event_type: event_type.into(),
            listener,
            receiver,
        };
        for target in &st.targets {
            binding.apply(target);
        }
        trace!(model = %kind, event_type = &*binding.event_type, "model listener added");
        st.bindings.push(binding);
    }

    /// Removes every matching binding and detaches it from all current targets.
    pub fn remove_model_listener(
        &self,
        kind: ModelKind,
        event_type: &str,
        listener: &Listener,
        receiver: Option<ReceiverId>,
    ) {
        let mut st = self.state.lock();
        let before = st.bindings.len();
        st.bindings
            .retain(|b| !b.matches(kind, event_type, listener, receiver));
        let removed = before - st.bindings.len();
        if removed == 0 {
            return;
        }

        for target in &st.targets {
            if let Some(model) = target.model(kind) {
                model
                    .emitter()
                    .remove_listener(event_type, listener, receiver);
            }
        }
        trace!(model = %kind, event_type, removed, "model listener removed");
    }

    // ---------------------------
    // Suspend / resume
    // ---------------------------

    /// Suspends every model of every target, in target then model order.
    ///
    /// No-op (empty report) if already suspended. `suspend_model` is dispatched
    /// synchronously and never awaited; failures are collected, not propagated.
    pub fn suspend_all_targets(&self) -> LifecycleReport {
        let targets = {
            let mut st = self.state.lock();
            if st.suspended {
                return LifecycleReport::default();
            }
            st.suspended = true;
            st.targets.clone()
        };
        self.bus.publish(Event::suspend_state_changed(true));

        let mut report = LifecycleReport::default();
        for target in &targets {
            for model in target.models() {
                let failure = model.suspend_model().err().map(|error| {
                    warn!(
                        target_id = %target.id(),
                        model = %model.kind(),
                        error = error.as_label(),
                        "model suspend failed"
                    );
                    ModelFailure {
                        target: target.id(),
                        model: model.kind(),
                        phase: LifecyclePhase::Suspend,
                        error,
                    }
                });
                report.record(failure);
            }
        }

        debug!(
            models = report.attempted(),
            failures = report.failures().len(),
            "targets suspended"
        );
        report
    }

    /// Resumes every model of every target concurrently and waits for all of them.
    ///
    /// Fails with [`RegistryError::NotSuspended`] if not suspended. A failing model
    /// does not cut the others short; its failure is part of the report.
    pub async fn resume_all_targets(&self) -> Result<LifecycleReport, RegistryError> {
        let targets = {
            let mut st = self.state.lock();
            if !st.suspended {
                return Err(RegistryError::NotSuspended);
            }
            st.suspended = false;
            st.targets.clone()
        };
        self.bus.publish(Event::suspend_state_changed(false));

        let pending = targets.iter().flat_map(|target| {
            let id = target.id();
            target.models().iter().map(move |model| {
                let model = Arc::clone(model);
                async move {
                    let result = model.resume_model().await;
                    (id, model.kind(), result)
                }
            })
        });

        let mut report = LifecycleReport::default();
        for (target, kind, result) in join_all(pending).await {
            let failure = result.err().map(|error| {
                warn!(
                    target_id = %target,
                    model = %kind,
                    error = error.as_label(),
                    "model resume failed"
                );
                ModelFailure {
                    target,
                    model: kind,
                    phase: LifecyclePhase::Resume,
                    error,
                }
            });
            report.record(failure);
        }

        debug!(
            models = report.attempted(),
            failures = report.failures().len(),
            "targets resumed"
        );
        Ok(report)
    }

    /// Suspends (if not already suspended), then resumes; returns both reports merged.
    pub async fn suspend_and_resume_all_targets(&self) -> LifecycleReport {
        let suspended = self.suspend_all_targets();
        match self.resume_all_targets().await {
            Ok(resumed) => suspended.merge(resumed),
            Err(err) => {
                // Another caller resumed in between.
                debug!(error = err.as_label(), "resume skipped");
                suspended
            }
        }
    }

    pub fn all_targets_suspended(&self) -> bool {
        self.state.lock().suspended
    }

    // ---------------------------
    // Page
    // ---------------------------

    /// Asks the main target's page model to reload the page.
    ///
    /// Returns `false` if there is no main target or it has no page-capable model.
    pub fn reload_page(&self, bypass_cache: bool, injected_script: Option<&str>) -> bool {
        let Some(main) = self.main_target() else {
            return false;
        };
        let Some(page) = main.model(self.cfg.page_model).and_then(|m| m.page()) else {
            return false;
        };
        page.reload_page(bypass_cache, injected_script);
        true
    }

    fn attach_page_listener(&self, target: &Target) {
        if !self.cfg.redispatch_page_events {
            return;
        }
        if let Some(model) = target.model(self.cfg.page_model) {
            for event_type in page_events::ALL {
                model
                    .emitter()
                    .add_listener(event_type, Arc::clone(&self.page_listener), None);
            }
            trace!(target_id = %target.id(), "page events re-dispatched");
        }
    }

    fn detach_page_listener(&self, target: &Target) {
        if let Some(model) = target.model(self.cfg.page_model) {
            for event_type in page_events::ALL {
                model
                    .emitter()
                    .remove_listener(event_type, &self.page_listener, None);
            }
        }
    }

    // ---------------------------
    // Events & shutdown
    // ---------------------------

    /// Receiver of registry events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Stops the subscriber listener and waits until subscriber workers drained
    /// their queues. Registry operations keep working; events only reach
    /// [`subscribe`](Self::subscribe) receivers afterwards.
    pub async fn shutdown(&self) {
        self.runtime_token.cancel();
        let handle = self.subscriber_listener.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}
