//! Notifications emitted by executors.

use std::time::Duration;

/// Something an executor wants observers to know.
///
/// Sent best-effort over a `crossbeam_channel::Sender` registered with
/// [`DefaultSimulationExecutor::with_events`]. A full or disconnected
/// channel never affects the simulation.
///
/// [`DefaultSimulationExecutor::with_events`]: crate::DefaultSimulationExecutor::with_events
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulationEvent {
    /// A step finished successfully.
    StepCompleted {
        /// Step count after the step.
        step_count: u64,
        /// Wall-clock duration of the step.
        duration: Duration,
    },
    /// The termination condition became true.
    Finished {
        /// Step count at which the simulation finished.
        step_count: u64,
    },
    /// A step exceeded its time budget and the executor paused.
    TimedOut {
        /// Step count after the slow step.
        step_count: u64,
        /// How long the step took.
        duration: Duration,
        /// The budget it exceeded.
        limit: Duration,
    },
    /// A multi-step run stopped on a cancellation request.
    Cancelled {
        /// Step count when cancellation was observed.
        step_count: u64,
    },
}

impl SimulationEvent {
    /// Step count carried by every event.
    pub fn step_count(&self) -> u64 {
        match *self {
            Self::StepCompleted { step_count, .. }
            | Self::Finished { step_count }
            | Self::TimedOut { step_count, .. }
            | Self::Cancelled { step_count } => step_count,
        }
    }
}
