//! Error types used by the target registry and by per-target models.
//!
//! This module defines two main error enums:
//!
//! - [`RegistryError`]: errors raised by registry operations themselves.
//! - [`ModelError`]: errors raised by an individual model while suspending or resuming.
//!
//! Model errors are never propagated as registry errors: they are collected into a
//! [`LifecycleReport`](crate::LifecycleReport) so one failing model cannot keep the
//! others from being suspended or resumed.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

use crate::targets::{ModelKind, TargetId};

/// # Errors produced by the target registry.
///
/// Removing absent targets or unregistering absent observers is not an error;
/// these variants describe invalid state transitions only.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The same observer instance was registered twice without an
    /// intervening `unobserve_targets`.
    #[error("observer '{observer}' can only be registered once")]
    DuplicateObserver {
        /// Name reported by the observer.
        observer: &'static str,
    },

    /// `resume_all_targets` was called while the registry was not suspended.
    #[error("targets are not suspended")]
    NotSuspended,

    /// A target with the same id is already registered.
    #[error("target {id} is already registered")]
    DuplicateTarget {
        /// Id of the rejected target.
        id: TargetId,
    },

    /// The target was removed earlier; removed targets are never reused.
    #[error("target {id} was disposed and cannot be added again")]
    TargetDisposed {
        /// Id of the rejected target.
        id: TargetId,
    },

    /// One of the target's models was built into another target first.
    #[error("model '{model}' of target {id} already belongs to another target")]
    ModelAlreadyOwned {
        /// Id of the rejected target.
        id: TargetId,
        /// Kind of the shared model.
        model: ModelKind,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use targetvisor::RegistryError;
    ///
    /// assert_eq!(RegistryError::NotSuspended.as_label(), "registry_not_suspended");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DuplicateObserver { .. } => "registry_duplicate_observer",
            RegistryError::NotSuspended => "registry_not_suspended",
            RegistryError::DuplicateTarget { .. } => "registry_duplicate_target",
            RegistryError::TargetDisposed { .. } => "registry_target_disposed",
            RegistryError::ModelAlreadyOwned { .. } => "registry_model_already_owned",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::DuplicateObserver { observer } => {
                format!("duplicate observer: {observer}")
            }
            RegistryError::NotSuspended => "resume requested while not suspended".to_string(),
            RegistryError::DuplicateTarget { id } => format!("duplicate target: {id}"),
            RegistryError::TargetDisposed { id } => format!("disposed target: {id}"),
            RegistryError::ModelAlreadyOwned { id, model } => {
                format!("shared model: {model} on target {id}")
            }
        }
    }
}

/// # Errors produced by a model's suspend/resume hooks.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The model could not complete the lifecycle transition.
    #[error("model transition failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The model's backend went away (e.g. the connection closed) before the
    /// transition could run.
    #[error("model backend unavailable")]
    Unavailable,
}

impl ModelError {
    /// Shorthand for [`ModelError::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        ModelError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use targetvisor::ModelError;
    ///
    /// assert_eq!(ModelError::failed("boom").as_label(), "model_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ModelError::Failed { .. } => "model_failed",
            ModelError::Unavailable => "model_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ModelError::Failed { error } => format!("error: {error}"),
            ModelError::Unavailable => "backend unavailable".to_string(),
        }
    }
}
