use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{config::Config, registry::Registry};
use crate::{
    events::{Bus, Event},
    subscribers::{Subscribe, SubscriberSet},
    targets::FactoryRef,
};

/// Builder for constructing a [`Registry`] with optional features.
pub struct RegistryBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    factories: Vec<FactoryRef>,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            factories: Vec::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive registry events (suspend state, page lifecycle, subscriber
    /// health) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends a model factory used by [`Registry::create_target`].
    pub fn with_factory(mut self, factory: FactoryRef) -> Self {
        self.factories.push(factory);
        self
    }

    /// Appends several model factories, keeping their order.
    pub fn with_factories(mut self, factories: impl IntoIterator<Item = FactoryRef>) -> Self {
        self.factories.extend(factories);
        self
    }

    /// Builds and returns the registry.
    ///
    /// With subscribers configured this spawns their workers and the bus listener,
    /// so it must be called from within a tokio runtime. Without subscribers no
    /// task is spawned and the registry is usable from plain synchronous code.
    pub fn build(self) -> Arc<Registry> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let runtime_token = CancellationToken::new();

        let listener = (!self.subscribers.is_empty()).then(|| {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            subscriber_listener(bus.subscribe(), set, runtime_token.clone())
        });

        Arc::new(Registry::new_internal(
            self.cfg,
            self.factories,
            bus,
            runtime_token,
            listener,
        ))
    }
}

/// Forwards bus events to the subscriber set until cancelled, then drains.
fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        set.emit(&ev);
                    }
                    break;
                }
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "subscriber listener lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        set.shutdown().await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::events::EventKind;
    use crate::targets::{Capabilities, Model, ModelKind, Target, page_events};
    use crate::targets::testing::RecordingModel;

    struct Collect(Arc<Mutex<Vec<EventKind>>>);

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().push(ev.kind);
        }

        fn name(&self) -> &'static str {
            "collect"
        }
    }

    #[test]
    fn test_build_without_subscribers_needs_no_runtime() {
        let reg = RegistryBuilder::new(Config::default()).build();
        reg.add_target(Target::builder("t", Capabilities::JS).build())
            .unwrap();
        reg.suspend_all_targets();
        assert!(reg.all_targets_suspended());
    }

    #[tokio::test]
    async fn test_subscribers_receive_registry_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Collect(seen.clone()))];
        let reg = RegistryBuilder::new(Config::default())
            .with_subscribers(subs)
            .build();

        let page = RecordingModel::arc(ModelKind::RESOURCE_TREE);
        reg.add_target(
            Target::builder("main", Capabilities::DOM)
                .with_model(page.clone())
                .build(),
        )
        .unwrap();

        reg.suspend_all_targets();
        page.emitter().emit(page_events::LOAD, None);
        reg.resume_all_targets().await.unwrap();
        reg.shutdown().await;

        assert_eq!(
            *seen.lock(),
            vec![
                EventKind::SuspendStateChanged,
                EventKind::Load,
                EventKind::SuspendStateChanged,
            ]
        );
    }
}
