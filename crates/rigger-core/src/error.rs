//! Error types for installer operations.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// How the install sequence reacts to a failed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Stop the remaining steps and let the status check decide the outcome.
    Recheck,
    /// Abort the whole operation and surface the error.
    Abort,
}

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("can't find installer '{unit}' in subsystem '{subsystem}'")]
    NotFound { subsystem: String, unit: String },

    #[error("no unit name given")]
    MissingUnitName,

    #[error("no destination directory set for instance")]
    MissingDestination,

    #[error("no instance specified")]
    MissingInstance,

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("{step} failed for '{unit}': {message}")]
    StepFailed {
        unit: String,
        step: String,
        message: String,
    },

    #[error("alias '{alias}' names one checkout but {count} units were given")]
    AliasForManyUnits { alias: String, count: usize },

    #[error("'{system}' installer does not support {operation}")]
    Unsupported { system: String, operation: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InstallerError {
    pub fn not_found(subsystem: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::NotFound {
            subsystem: subsystem.into(),
            unit: unit.into(),
        }
    }

    pub fn unsupported(system: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            system: system.into(),
            operation: operation.into(),
        }
    }

    /// Classify the error for the install sequence.
    ///
    /// Only failures produced while running a lifecycle step are soft; missing
    /// units, missing preconditions and plumbing errors always abort.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Execution(_) | Self::StepFailed { .. } => Disposition::Recheck,
            _ => Disposition::Abort,
        }
    }
}

/// A task script could not be run to completion.
///
/// Carries everything needed to reproduce the invocation by hand.
#[derive(Debug, Error)]
#[error("task '{task}' failed to run: {reason} (argv: {argv:?}, env: {env:?})")]
pub struct ExecutionError {
    pub task: String,
    pub argv: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub reason: FailureReason,
}

#[derive(Debug, Error)]
pub enum FailureReason {
    #[error("{0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed waiting for task: {0}")]
    Wait(#[source] std::io::Error),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

pub type Result<T, E = InstallerError> = std::result::Result<T, E>;
