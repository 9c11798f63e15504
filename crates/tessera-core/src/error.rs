//! Errors raised while advancing a simulation.

use std::error::Error;
use std::fmt;

/// Errors from executing a simulation step.
///
/// Step logic reports its own failures as [`StepError::LogicFailed`]; the
/// executors add the two refusal variants. None of these are caught by the
/// framework: they propagate to the caller, who decides whether to halt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// Per-cell or per-agent logic failed.
    LogicFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The termination condition already holds; no further steps run.
    SimulationFinished {
        /// Step count at which the simulation finished.
        step_count: u64,
    },
    /// The executor is paused after a step timeout and must be resumed.
    SimulationPaused {
        /// Step count at which the pause began.
        step_count: u64,
    },
}

impl StepError {
    /// Shorthand for [`StepError::LogicFailed`].
    pub fn logic(reason: impl Into<String>) -> Self {
        Self::LogicFailed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogicFailed { reason } => write!(f, "step logic failed: {reason}"),
            Self::SimulationFinished { step_count } => {
                write!(f, "simulation finished at step {step_count}")
            }
            Self::SimulationPaused { step_count } => {
                write!(f, "simulation paused at step {step_count} after a timeout")
            }
        }
    }
}

impl Error for StepError {}
