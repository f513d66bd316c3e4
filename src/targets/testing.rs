//! Test doubles shared by the unit tests of this crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Barrier;

use super::{Model, ModelEmitter, ModelKind, PageControl, Target, TargetId, TargetObserver};
use crate::error::ModelError;

/// Shared, ordered record of calls across several doubles.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Model counting its lifecycle calls.
pub(crate) struct RecordingModel {
    kind: ModelKind,
    label: &'static str,
    emitter: ModelEmitter,
    suspends: AtomicUsize,
    resumes: AtomicUsize,
    resumes_done: AtomicUsize,
    fail_suspend: bool,
    fail_resume: bool,
    resume_delay: Duration,
    resume_barrier: Option<Arc<Barrier>>,
    log: Option<CallLog>,
    reloads: Mutex<Vec<(bool, Option<String>)>>,
}

impl RecordingModel {
    pub(crate) fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            label: kind.name(),
            emitter: ModelEmitter::new(),
            suspends: AtomicUsize::new(0),
            resumes: AtomicUsize::new(0),
            resumes_done: AtomicUsize::new(0),
            fail_suspend: false,
            fail_resume: false,
            resume_delay: Duration::ZERO,
            resume_barrier: None,
            log: None,
            reloads: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn arc(kind: ModelKind) -> Arc<Self> {
        Arc::new(Self::new(kind))
    }

    pub(crate) fn labeled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub(crate) fn failing_suspend(mut self) -> Self {
        self.fail_suspend = true;
        self
    }

    pub(crate) fn failing_resume(mut self) -> Self {
        self.fail_resume = true;
        self
    }

    pub(crate) fn with_resume_delay(mut self, delay: Duration) -> Self {
        self.resume_delay = delay;
        self
    }

    /// Resume blocks until every model sharing `barrier` is resuming.
    pub(crate) fn with_resume_barrier(mut self, barrier: &Arc<Barrier>) -> Self {
        self.resume_barrier = Some(Arc::clone(barrier));
        self
    }

    pub(crate) fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    pub(crate) fn suspends(&self) -> usize {
        self.suspends.load(AtomicOrdering::SeqCst)
    }

    pub(crate) fn resumes(&self) -> usize {
        self.resumes.load(AtomicOrdering::SeqCst)
    }

    pub(crate) fn resumes_done(&self) -> usize {
        self.resumes_done.load(AtomicOrdering::SeqCst)
    }

    pub(crate) fn reloads(&self) -> Vec<(bool, Option<String>)> {
        self.reloads.lock().clone()
    }

    fn record(&self, what: &str) {
        if let Some(log) = &self.log {
            log.lock().push(format!("{what}:{}", self.label));
        }
    }
}

#[async_trait]
impl Model for RecordingModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn emitter(&self) -> &ModelEmitter {
        &self.emitter
    }

    fn suspend_model(&self) -> Result<(), ModelError> {
        self.suspends.fetch_add(1, AtomicOrdering::SeqCst);
        self.record("suspend");
        if self.fail_suspend {
            return Err(ModelError::failed(format!("{} refused to suspend", self.label)));
        }
        Ok(())
    }

    async fn resume_model(&self) -> Result<(), ModelError> {
        self.resumes.fetch_add(1, AtomicOrdering::SeqCst);
        self.record("resume");
        if let Some(barrier) = &self.resume_barrier {
            barrier.wait().await;
        }
        if !self.resume_delay.is_zero() {
            tokio::time::sleep(self.resume_delay).await;
        }
        self.resumes_done.fetch_add(1, AtomicOrdering::SeqCst);
        if self.fail_resume {
            return Err(ModelError::failed(format!("{} refused to resume", self.label)));
        }
        Ok(())
    }

    fn page(&self) -> Option<&dyn PageControl> {
        (self.kind == ModelKind::RESOURCE_TREE).then_some(self as &dyn PageControl)
    }
}

impl PageControl for RecordingModel {
    fn reload_page(&self, bypass_cache: bool, injected_script: Option<&str>) {
        self.reloads
            .lock()
            .push((bypass_cache, injected_script.map(str::to_string)));
    }
}

/// Observer appending `added:<name>:<target>` / `removed:<name>:<target>` to a log.
pub(crate) struct RecordingObserver {
    name: &'static str,
    log: CallLog,
}

impl RecordingObserver {
    pub(crate) fn arc(name: &'static str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
        })
    }
}

impl TargetObserver for RecordingObserver {
    fn target_added(&self, target: &Arc<Target>) {
        self.log
            .lock()
            .push(format!("added:{}:{}", self.name, target.name()));
    }

    fn target_removed(&self, target: &Arc<Target>) {
        self.log
            .lock()
            .push(format!("removed:{}:{}", self.name, target.name()));
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Ids of the given targets, in order.
pub(crate) fn ids(targets: &[Arc<Target>]) -> Vec<TargetId> {
    targets.iter().map(|t| t.id()).collect()
}
