//! Step execution: timing, statistics, termination and events.
//!
//! [`DefaultSimulationExecutor`] drives a [`StepRunner`]. Each call to
//! [`execute_step()`](SimulationExecutor::execute_step) runs exactly one
//! step to completion on the calling thread, then evaluates the
//! termination condition. Once finished, every further step is refused.

use std::fmt;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use log::{debug, info, trace};
use tessera_core::{GridEntity, StepError};
use tessera_grid::ReadableGridModel;

use crate::cancel::CancellationToken;
use crate::event::SimulationEvent;
use crate::metrics::StepTimingStatistics;
use crate::runner::StepRunner;
use crate::statistics::SimulationStatistics;
use crate::termination::TerminationCondition;

// ── Reports ─────────────────────────────────────────────────────

/// Outcome of one successful step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Step count after the step.
    pub step_count: u64,
    /// Wall-clock duration of the step.
    pub duration: Duration,
    /// Whether the termination condition became true.
    pub finished: bool,
}

/// Outcome of [`SimulationExecutor::execute_steps`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Step count when the run stopped.
    pub step_count: u64,
    /// Steps performed by this run.
    pub executed_steps: u64,
    /// The simulation finished.
    pub finished: bool,
    /// The run stopped on a cancellation request.
    pub cancelled: bool,
    /// The run stopped because the executor paused itself.
    pub paused: bool,
}

// ── SimulationExecutor ──────────────────────────────────────────

/// Runs steps and tracks lifecycle state.
pub trait SimulationExecutor {
    /// Entity type stored in the model.
    type Entity: GridEntity;
    /// Model type exposed between steps.
    type Model: ReadableGridModel<Self::Entity>;
    /// Statistics type maintained across steps.
    type Statistics: SimulationStatistics;

    /// Run one step.
    ///
    /// # Errors
    ///
    /// [`StepError::SimulationFinished`] or [`StepError::SimulationPaused`]
    /// if the executor refuses to step, otherwise whatever the step logic
    /// raised.
    fn execute_step(&mut self) -> Result<StepReport, StepError>;

    /// Steps completed so far.
    fn step_count(&self) -> u64;

    /// The model as of the last completed step.
    fn current_model(&self) -> &Self::Model;

    /// Statistics as of the last completed step.
    fn statistics(&self) -> &Self::Statistics;

    /// Whether the termination condition has been met.
    fn is_finished(&self) -> bool;

    /// Whether steps are currently paused. Only timed executors pause.
    fn is_paused(&self) -> bool {
        false
    }

    /// Whether a call to [`execute_step`](Self::execute_step) would run.
    fn is_running(&self) -> bool {
        !self.is_finished() && !self.is_paused()
    }

    /// Called between steps of [`execute_steps`](Self::execute_steps);
    /// returning `true` stops the run.
    fn observe_cancellation(&mut self) -> bool {
        false
    }

    /// Run up to `count` steps, stopping early when the simulation
    /// finishes, pauses, or is cancelled. `on_step` sees every report.
    ///
    /// # Errors
    ///
    /// The first [`StepError`] aborts the run.
    fn execute_steps(
        &mut self,
        count: u64,
        on_step: &mut dyn FnMut(&StepReport),
    ) -> Result<ExecutionResult, StepError> {
        let mut executed_steps = 0;
        let mut cancelled = false;
        while executed_steps < count && self.is_running() {
            if self.observe_cancellation() {
                cancelled = true;
                break;
            }
            let report = self.execute_step()?;
            executed_steps += 1;
            on_step(&report);
        }
        Ok(ExecutionResult {
            step_count: self.step_count(),
            executed_steps,
            finished: self.is_finished(),
            cancelled,
            paused: self.is_paused(),
        })
    }
}

// ── DefaultSimulationExecutor ───────────────────────────────────

/// Executor timing each step and evaluating a termination condition.
///
/// # Example
///
/// ```
/// use tessera_core::{Coordinate, StepError};
/// use tessera_engine::{
///     BasicStatistics, DefaultSimulationExecutor, MaxSteps, SimulationExecutor, SynchronousStepRunner,
/// };
/// use tessera_grid::{DenseGridModel, ReadableGridModel, WritableGridModel};
/// use tessera_space::{CellShape, GridEdgeBehavior, GridStructure};
///
/// let structure = GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::BLOCK_XY, 8, 8).unwrap();
/// let model = DenseGridModel::new(structure, 0u8);
/// let grow = |current: &DenseGridModel<u8>, next: &mut DenseGridModel<u8>, step: u64, _: &mut BasicStatistics| {
///     next.copy_from(current).map_err(|e| StepError::logic(e.to_string()))?;
///     next.set_entity(Coordinate::new(step as i32, 0), 1);
///     Ok::<(), StepError>(())
/// };
/// let runner = SynchronousStepRunner::new(model, grow);
/// let mut executor = DefaultSimulationExecutor::new(runner, MaxSteps(3), BasicStatistics::new(64));
/// let result = executor.execute_steps(10, &mut |_| {}).unwrap();
/// assert_eq!(result.executed_steps, 3);
/// assert!(result.finished);
/// assert_eq!(executor.current_model().non_default_count(), 3);
/// ```
pub struct DefaultSimulationExecutor<R: StepRunner, C> {
    runner: R,
    termination: C,
    statistics: R::Statistics,
    timing: StepTimingStatistics,
    step_count: u64,
    finished: bool,
    events: Option<Sender<SimulationEvent>>,
    cancellation: CancellationToken,
}

impl<R, C> DefaultSimulationExecutor<R, C>
where
    R: StepRunner,
    C: TerminationCondition<R::Model, R::Statistics>,
{
    /// Executor at step 0. The termination condition is first evaluated
    /// after the first step.
    pub fn new(runner: R, termination: C, statistics: R::Statistics) -> Self {
        Self {
            runner,
            termination,
            statistics,
            timing: StepTimingStatistics::default(),
            step_count: 0,
            finished: false,
            events: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Send [`SimulationEvent`]s to `sender`. Sending never blocks; events
    /// that do not fit are dropped.
    pub fn with_events(mut self, sender: Sender<SimulationEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Use `token` instead of the executor's own cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// A handle that stops [`execute_steps`](SimulationExecutor::execute_steps)
    /// between steps. The request persists until
    /// [`CancellationToken::reset`] is called.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// The runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Mutable access to the runner between steps.
    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Cumulative step timing.
    pub fn timing(&self) -> &StepTimingStatistics {
        &self.timing
    }

    pub(crate) fn emit(&self, event: SimulationEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.try_send(event);
        }
    }
}

impl<R, C> SimulationExecutor for DefaultSimulationExecutor<R, C>
where
    R: StepRunner,
    C: TerminationCondition<R::Model, R::Statistics>,
{
    type Entity = R::Entity;
    type Model = R::Model;
    type Statistics = R::Statistics;

    fn execute_step(&mut self) -> Result<StepReport, StepError> {
        if self.finished {
            return Err(StepError::SimulationFinished {
                step_count: self.step_count,
            });
        }

        let start = Instant::now();
        self.runner.perform_step(self.step_count, &mut self.statistics)?;
        let duration = start.elapsed();

        self.step_count += 1;
        self.timing
            .record(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX));
        self.statistics.update(self.step_count, &self.timing);
        self.finished = self.termination.is_finished(
            self.runner.current_model(),
            self.step_count,
            &self.statistics,
        );

        debug!("step {} completed in {duration:?}", self.step_count);
        self.emit(SimulationEvent::StepCompleted {
            step_count: self.step_count,
            duration,
        });
        if self.finished {
            info!("simulation finished after {} steps", self.step_count);
            self.emit(SimulationEvent::Finished {
                step_count: self.step_count,
            });
        }

        Ok(StepReport {
            step_count: self.step_count,
            duration,
            finished: self.finished,
        })
    }

    fn step_count(&self) -> u64 {
        self.step_count
    }

    fn current_model(&self) -> &R::Model {
        self.runner.current_model()
    }

    fn statistics(&self) -> &R::Statistics {
        &self.statistics
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn observe_cancellation(&mut self) -> bool {
        if !self.cancellation.is_cancelled() {
            return false;
        }
        trace!("cancellation observed at step {}", self.step_count);
        self.emit(SimulationEvent::Cancelled {
            step_count: self.step_count,
        });
        true
    }
}

impl<R: StepRunner, C> fmt::Debug for DefaultSimulationExecutor<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultSimulationExecutor")
            .field("step_count", &self.step_count)
            .field("finished", &self.finished)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::BasicStatistics;
    use crate::synchronous::SynchronousStepRunner;
    use crate::termination::{MaxSteps, Never};
    use tessera_core::Coordinate;
    use tessera_grid::{DenseGridModel, WritableGridModel};
    use tessera_space::{CellShape, GridEdgeBehavior, GridStructure};

    type Model = DenseGridModel<u8>;

    fn model() -> Model {
        let structure = GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::BLOCK_XY, 8, 8).unwrap();
        DenseGridModel::new(structure, 0)
    }

    /// Sets one more cell of row 0 every step.
    fn grow(current: &Model, next: &mut Model, step: u64, _: &mut BasicStatistics) -> Result<(), StepError> {
        next.copy_from(current).map_err(|e| StepError::logic(e.to_string()))?;
        if step >= 8 {
            return Err(StepError::logic("row full"));
        }
        next.set_entity(Coordinate::new(step as i32, 0), 1);
        Ok(())
    }

    type Grow = fn(&Model, &mut Model, u64, &mut BasicStatistics) -> Result<(), StepError>;

    fn executor<C>(termination: C) -> DefaultSimulationExecutor<SynchronousStepRunner<u8, Model, BasicStatistics, Grow>, C>
    where
        C: TerminationCondition<Model, BasicStatistics>,
    {
        let runner = SynchronousStepRunner::new(model(), grow as Grow);
        DefaultSimulationExecutor::new(runner, termination, BasicStatistics::new(64))
    }

    // ── Lifecycle ───────────────────────────────────────────────

    #[test]
    fn statistics_follow_steps() {
        let mut ex = executor(Never);
        let report = ex.execute_step().unwrap();
        assert_eq!(report.step_count, 1);
        assert!(!report.finished);
        assert_eq!(ex.statistics().step_count(), 1);
        assert_eq!(ex.statistics().timing().samples, 1);
        assert_eq!(ex.timing().samples, 1);
    }

    #[test]
    fn finished_executor_refuses_steps() {
        let mut ex = executor(MaxSteps(2));
        assert!(ex.is_running());
        ex.execute_step().unwrap();
        assert!(ex.execute_step().unwrap().finished);
        assert!(ex.is_finished());
        assert!(!ex.is_running());
        assert_eq!(
            ex.execute_step(),
            Err(StepError::SimulationFinished { step_count: 2 })
        );
        assert_eq!(ex.current_model().non_default_count(), 2);
    }

    #[test]
    fn termination_sees_model_after_step() {
        let three = |m: &Model, _: u64, _: &BasicStatistics| m.non_default_count() == 3;
        let mut ex = executor(three);
        let result = ex.execute_steps(100, &mut |_| {}).unwrap();
        assert_eq!(result.executed_steps, 3);
        assert!(result.finished);
        assert!(!result.cancelled);
    }

    #[test]
    fn step_error_propagates_and_keeps_count() {
        let mut ex = executor(Never);
        let mut seen = Vec::new();
        let err = ex
            .execute_steps(20, &mut |r| seen.push(r.step_count))
            .unwrap_err();
        assert_eq!(err, StepError::logic("row full"));
        assert_eq!(seen, (1..=8).collect::<Vec<_>>());
        assert_eq!(ex.step_count(), 8);
        assert_eq!(ex.current_model().non_default_count(), 8);
    }

    // ── Cancellation & events ───────────────────────────────────

    #[test]
    fn cancellation_is_observed_between_steps() {
        let mut ex = executor(Never);
        let token = ex.cancellation_token();
        let result = ex
            .execute_steps(5, &mut |r| {
                if r.step_count == 2 {
                    token.cancel();
                }
            })
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.executed_steps, 2);
        assert_eq!(ex.step_count(), 2);

        // Still cancelled until reset.
        assert_eq!(ex.execute_steps(5, &mut |_| {}).unwrap().executed_steps, 0);
        ex.cancellation_token().reset();
        assert_eq!(ex.execute_steps(1, &mut |_| {}).unwrap().executed_steps, 1);
    }

    #[test]
    fn events_are_sent_in_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut ex = executor(MaxSteps(2)).with_events(tx);
        ex.execute_steps(5, &mut |_| {}).unwrap();
        let events: Vec<SimulationEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SimulationEvent::StepCompleted { step_count: 1, .. }));
        assert!(matches!(events[1], SimulationEvent::StepCompleted { step_count: 2, .. }));
        assert_eq!(events[2], SimulationEvent::Finished { step_count: 2 });
    }

    #[test]
    fn full_event_channel_never_blocks() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let mut ex = executor(Never).with_events(tx);
        let result = ex.execute_steps(4, &mut |_| {}).unwrap();
        assert_eq!(result.executed_steps, 4);
        assert_eq!(rx.try_iter().count(), 1);
    }
}
