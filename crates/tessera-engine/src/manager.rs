//! The outer facade bundling configuration, structure and executor.

use tessera_core::{GridEntity, StepError};
use tessera_grid::ReadableGridModel;
use tessera_space::GridStructure;

use crate::config::{ConfigError, SimulationConfig};
use crate::executor::{ExecutionResult, SimulationExecutor, StepReport};
use crate::statistics::SimulationStatistics;

/// What a front end (renderer, CLI, test) needs from a running simulation.
pub trait SimulationManager {
    /// Entity type stored in the model.
    type Entity: GridEntity;
    /// Model type exposed for rendering.
    type Model: ReadableGridModel<Self::Entity>;
    /// Statistics type of the simulation.
    type Statistics: SimulationStatistics;

    /// Geometry of the grid.
    fn structure(&self) -> &GridStructure;

    /// The configuration the simulation was built from.
    fn config(&self) -> &SimulationConfig;

    /// Statistics as of the last completed step.
    fn statistics(&self) -> &Self::Statistics;

    /// Run one step. See [`SimulationExecutor::execute_step`].
    fn execute_step(&mut self) -> Result<StepReport, StepError>;

    /// Run up to `count` steps. See [`SimulationExecutor::execute_steps`].
    fn execute_steps(
        &mut self,
        count: u64,
        on_step: &mut dyn FnMut(&StepReport),
    ) -> Result<ExecutionResult, StepError>;

    /// Whether the termination condition has been met.
    fn is_finished(&self) -> bool;

    /// Whether another step would run.
    fn is_running(&self) -> bool;

    /// Steps completed so far.
    fn step_count(&self) -> u64;

    /// The model as of the last completed step.
    fn current_model(&self) -> &Self::Model;
}

/// A simulation built from a [`SimulationConfig`] and any executor.
#[derive(Debug)]
pub struct Simulation<X> {
    config: SimulationConfig,
    structure: GridStructure,
    executor: X,
}

impl<X: SimulationExecutor> Simulation<X> {
    /// Bundle `executor` with the `config` it was built from.
    ///
    /// # Errors
    ///
    /// Any validation error of `config`, or
    /// [`ConfigError::InvalidParameter`] if the executor's model does not
    /// have the configured structure.
    pub fn new(config: SimulationConfig, executor: X) -> Result<Self, ConfigError> {
        config.validate()?;
        let structure = config.structure()?;
        let actual = executor.current_model().structure();
        if *actual != structure {
            return Err(ConfigError::invalid(
                "executor",
                format!("model is {actual}, config describes {structure}"),
            ));
        }
        Ok(Self {
            config,
            structure,
            executor,
        })
    }

    /// The executor.
    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Mutable access to the executor, e.g. to resume a timed executor.
    pub fn executor_mut(&mut self) -> &mut X {
        &mut self.executor
    }

    /// Give up the facade and keep the executor.
    pub fn into_executor(self) -> X {
        self.executor
    }
}

impl<X: SimulationExecutor> SimulationManager for Simulation<X> {
    type Entity = X::Entity;
    type Model = X::Model;
    type Statistics = X::Statistics;

    fn structure(&self) -> &GridStructure {
        &self.structure
    }

    fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn statistics(&self) -> &X::Statistics {
        self.executor.statistics()
    }

    fn execute_step(&mut self) -> Result<StepReport, StepError> {
        self.executor.execute_step()
    }

    fn execute_steps(
        &mut self,
        count: u64,
        on_step: &mut dyn FnMut(&StepReport),
    ) -> Result<ExecutionResult, StepError> {
        self.executor.execute_steps(count, on_step)
    }

    fn is_finished(&self) -> bool {
        self.executor.is_finished()
    }

    fn is_running(&self) -> bool {
        self.executor.is_running()
    }

    fn step_count(&self) -> u64 {
        self.executor.step_count()
    }

    fn current_model(&self) -> &X::Model {
        self.executor.current_model()
    }
}
