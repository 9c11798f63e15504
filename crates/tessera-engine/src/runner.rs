//! The step-runner abstraction shared by both execution styles.

use tessera_core::{GridEntity, StepError};
use tessera_grid::ReadableGridModel;

use crate::statistics::SimulationStatistics;

/// Advances a model by one generation.
///
/// Implementations own their model(s). The executor passes the index of
/// the step being performed (0 for the first) and the statistics the
/// step logic may update.
pub trait StepRunner {
    /// Entity type stored in the model.
    type Entity: GridEntity;
    /// Model type exposed between steps.
    type Model: ReadableGridModel<Self::Entity>;
    /// Statistics type the step logic writes to.
    type Statistics: SimulationStatistics;

    /// Perform step number `step_index`.
    ///
    /// # Errors
    ///
    /// Any [`StepError`] raised by the step logic. What state the model is
    /// left in depends on the runner.
    fn perform_step(&mut self, step_index: u64, statistics: &mut Self::Statistics) -> Result<(), StepError>;

    /// The model as of the last completed step.
    fn current_model(&self) -> &Self::Model;
}
