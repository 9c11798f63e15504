//! Step-duration watchdog.
//!
//! [`TimedSimulationExecutor`] wraps a [`DefaultSimulationExecutor`] and
//! compares every step's duration against `timeout_factor` times the
//! expected step interval. A slow step still completes and its result is
//! kept; the executor then pauses until [`resume()`](TimedSimulationExecutor::resume)
//! is called. A timeout is never an error.

use std::fmt;
use std::time::Duration;

use log::warn;
use tessera_core::StepError;

use crate::config::{ConfigError, SimulationConfig};
use crate::event::SimulationEvent;
use crate::executor::{DefaultSimulationExecutor, SimulationExecutor, StepReport};
use crate::runner::StepRunner;
use crate::termination::TerminationCondition;

/// Details of a step that exceeded its budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeoutEvent {
    /// Step count after the slow step.
    pub step_count: u64,
    /// How long the step took.
    pub duration: Duration,
    /// The budget it exceeded.
    pub limit: Duration,
}

type TimeoutCallback = Box<dyn FnMut(TimeoutEvent) + Send>;

/// Executor that pauses after a step slower than its budget.
pub struct TimedSimulationExecutor<R: StepRunner, C> {
    inner: DefaultSimulationExecutor<R, C>,
    expected_interval: Duration,
    timeout_factor: f64,
    on_timeout: Option<TimeoutCallback>,
    paused: bool,
}

impl<R, C> TimedSimulationExecutor<R, C>
where
    R: StepRunner,
    C: TerminationCondition<R::Model, R::Statistics>,
{
    /// Wrap `inner` with a budget of `timeout_factor * expected_interval`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if the interval is zero or the
    /// factor is not a finite number of at least 1.
    pub fn new(
        inner: DefaultSimulationExecutor<R, C>,
        expected_interval: Duration,
        timeout_factor: f64,
    ) -> Result<Self, ConfigError> {
        if expected_interval.is_zero() {
            return Err(ConfigError::invalid("expected_step_interval", "must be non-zero"));
        }
        if !timeout_factor.is_finite() || timeout_factor < 1.0 {
            return Err(ConfigError::invalid(
                "timeout_factor",
                format!("must be finite and at least 1, got {timeout_factor}"),
            ));
        }
        Ok(Self {
            inner,
            expected_interval,
            timeout_factor,
            on_timeout: None,
            paused: false,
        })
    }

    /// Wrap `inner` with the budget from `config`.
    pub fn from_config(inner: DefaultSimulationExecutor<R, C>, config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::new(inner, config.expected_step_interval, config.timeout_factor)
    }

    /// Call `callback` on every timeout, after the executor has paused.
    pub fn with_timeout_callback(mut self, callback: impl FnMut(TimeoutEvent) + Send + 'static) -> Self {
        self.on_timeout = Some(Box::new(callback));
        self
    }

    /// The duration above which a step pauses the executor.
    pub fn limit(&self) -> Duration {
        self.expected_interval.mul_f64(self.timeout_factor)
    }

    /// Clear a pause. Returns whether the executor was paused.
    pub fn resume(&mut self) -> bool {
        std::mem::replace(&mut self.paused, false)
    }

    /// The wrapped executor.
    pub fn inner(&self) -> &DefaultSimulationExecutor<R, C> {
        &self.inner
    }

    /// Mutable access to the wrapped executor between steps.
    pub fn inner_mut(&mut self) -> &mut DefaultSimulationExecutor<R, C> {
        &mut self.inner
    }
}

impl<R, C> SimulationExecutor for TimedSimulationExecutor<R, C>
where
    R: StepRunner,
    C: TerminationCondition<R::Model, R::Statistics>,
{
    type Entity = R::Entity;
    type Model = R::Model;
    type Statistics = R::Statistics;

    fn execute_step(&mut self) -> Result<StepReport, StepError> {
        if self.paused && !self.inner.is_finished() {
            return Err(StepError::SimulationPaused {
                step_count: self.inner.step_count(),
            });
        }

        let report = self.inner.execute_step()?;
        let limit = self.limit();
        if report.duration > limit {
            self.paused = true;
            let event = TimeoutEvent {
                step_count: report.step_count,
                duration: report.duration,
                limit,
            };
            warn!(
                "step {} took {:?}, over the {limit:?} budget; pausing",
                event.step_count, event.duration
            );
            if let Some(callback) = self.on_timeout.as_mut() {
                callback(event);
            }
            self.inner.emit(SimulationEvent::TimedOut {
                step_count: event.step_count,
                duration: event.duration,
                limit,
            });
        }
        Ok(report)
    }

    fn step_count(&self) -> u64 {
        self.inner.step_count()
    }

    fn current_model(&self) -> &R::Model {
        self.inner.current_model()
    }

    fn statistics(&self) -> &R::Statistics {
        self.inner.statistics()
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn observe_cancellation(&mut self) -> bool {
        self.inner.observe_cancellation()
    }
}

impl<R: StepRunner, C> fmt::Debug for TimedSimulationExecutor<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedSimulationExecutor")
            .field("inner", &self.inner)
            .field("expected_interval", &self.expected_interval)
            .field("timeout_factor", &self.timeout_factor)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}
