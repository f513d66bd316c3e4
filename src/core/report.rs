//! # Aggregate result of a suspend/resume pass.
//!
//! Model failures never abort a pass: every model is attempted and each failure is
//! recorded as a [`ModelFailure`] in the returned [`LifecycleReport`].

use crate::error::ModelError;
use crate::targets::{ModelKind, TargetId};

/// Lifecycle transition a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Suspend,
    Resume,
}

/// One model that failed to transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFailure {
    pub target: TargetId,
    pub model: ModelKind,
    pub phase: LifecyclePhase,
    pub error: ModelError,
}

/// Outcome of `suspend_all_targets` / `resume_all_targets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    attempted: usize,
    failures: Vec<ModelFailure>,
}

impl LifecycleReport {
    pub(crate) fn record(&mut self, failure: Option<ModelFailure>) {
        self.attempted += 1;
        self.failures.extend(failure);
    }

    /// Number of models the pass invoked.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// True if no model failed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures in invocation order.
    pub fn failures(&self) -> &[ModelFailure] {
        &self.failures
    }

    pub fn first_failure(&self) -> Option<&ModelFailure> {
        self.failures.first()
    }

    pub fn into_failures(self) -> Vec<ModelFailure> {
        self.failures
    }

    /// Appends another report (suspend followed by resume).
    pub fn merge(mut self, other: LifecycleReport) -> Self {
        self.attempted += other.attempted;
        self.failures.extend(other.failures);
        self
    }
}
