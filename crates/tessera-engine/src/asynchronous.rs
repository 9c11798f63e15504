//! In-place agent stepping.
//!
//! [`AsynchronousStepRunner`] mutates a single model. Each step it
//! snapshots the agent cells, orders them and lets every agent act on the
//! live model in turn, so later agents see the moves of earlier ones.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tessera_core::{GridEntity, StepError};
use tessera_grid::{GridCell, WritableGridModel};

use crate::runner::StepRunner;
use crate::statistics::SimulationStatistics;

/// Logic for one agent's turn. Implemented for matching closures.
pub trait AgentStepLogic<T, M, S> {
    /// Let the agent snapshotted as `agent` act on `model`.
    ///
    /// The snapshot may be stale: an earlier agent in the same step may
    /// have moved or removed it.
    ///
    /// # Errors
    ///
    /// A [`StepError`] aborts the rest of the step; agents that already
    /// acted are not rolled back.
    fn perform_agent_step(
        &mut self,
        agent: &GridCell<T>,
        model: &mut M,
        step_index: u64,
        statistics: &mut S,
    ) -> Result<(), StepError>;
}

impl<T, M, S, F> AgentStepLogic<T, M, S> for F
where
    F: FnMut(&GridCell<T>, &mut M, u64, &mut S) -> Result<(), StepError>,
{
    fn perform_agent_step(
        &mut self,
        agent: &GridCell<T>,
        model: &mut M,
        step_index: u64,
        statistics: &mut S,
    ) -> Result<(), StepError> {
        self(agent, model, step_index, statistics)
    }
}

/// The order in which agents act within a step.
///
/// Agents are always collected in row-major order first, so the result
/// does not depend on the storage strategy.
#[derive(Clone, Debug)]
pub enum AgentOrdering<T> {
    /// Uniform random permutation from an owned, seeded generator.
    Shuffled(ChaCha8Rng),
    /// Row-major: by `y`, then `x`.
    ByPosition,
    /// Stable sort by a caller-provided comparator.
    Custom(fn(&GridCell<T>, &GridCell<T>) -> Ordering),
}

impl<T> AgentOrdering<T> {
    fn arrange(&mut self, agents: &mut [GridCell<T>]) {
        match self {
            Self::Shuffled(rng) => agents.shuffle(rng),
            Self::ByPosition => {}
            Self::Custom(compare) => agents.sort_by(|a, b| compare(a, b)),
        }
    }
}

/// Runner mutating one model in agent order.
pub struct AsynchronousStepRunner<T, M, S, L> {
    model: M,
    is_agent: Box<dyn Fn(&T) -> bool>,
    ordering: AgentOrdering<T>,
    logic: L,
    _marker: PhantomData<fn() -> S>,
}

impl<T, M, S, L> AsynchronousStepRunner<T, M, S, L>
where
    T: GridEntity,
    M: WritableGridModel<T>,
    S: SimulationStatistics,
    L: AgentStepLogic<T, M, S>,
{
    /// Runner over `model` where cells satisfying `is_agent` act each step.
    pub fn new(model: M, is_agent: impl Fn(&T) -> bool + 'static, ordering: AgentOrdering<T>, logic: L) -> Self {
        Self {
            model,
            is_agent: Box::new(is_agent),
            ordering,
            logic,
            _marker: PhantomData,
        }
    }

    /// The step logic.
    pub fn logic(&self) -> &L {
        &self.logic
    }

    /// Mutable access to the model between steps.
    pub fn current_model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Agent cells in the order they would act now, as owned copies.
    ///
    /// Advances a shuffling generator.
    pub fn ordered_agents(&mut self) -> Vec<GridCell<T>> {
        let mut agents = self.model.find_cells(&*self.is_agent);
        agents.sort_by_key(|cell| (cell.coordinate.y, cell.coordinate.x));
        self.ordering.arrange(&mut agents);
        agents
    }
}

impl<T, M, S, L> StepRunner for AsynchronousStepRunner<T, M, S, L>
where
    T: GridEntity,
    M: WritableGridModel<T>,
    S: SimulationStatistics,
    L: AgentStepLogic<T, M, S>,
{
    type Entity = T;
    type Model = M;
    type Statistics = S;

    fn perform_step(&mut self, step_index: u64, statistics: &mut S) -> Result<(), StepError> {
        let agents = self.ordered_agents();
        for agent in &agents {
            self.logic
                .perform_agent_step(agent, &mut self.model, step_index, statistics)?;
        }
        Ok(())
    }

    fn current_model(&self) -> &M {
        &self.model
    }
}

impl<T, M: fmt::Debug, S, L> fmt::Debug for AsynchronousStepRunner<T, M, S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsynchronousStepRunner")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::BasicStatistics;
    use rand::SeedableRng;
    use tessera_core::Coordinate;
    use tessera_grid::{DenseGridModel, ReadableGridModel, SparseGridModel};
    use tessera_space::{CellShape, GridEdgeBehavior, GridStructure};

    type Model = DenseGridModel<u8>;

    fn structure() -> GridStructure {
        GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::BLOCK_XY, 8, 8).unwrap()
    }

    fn seeded() -> Model {
        let mut m = DenseGridModel::new(structure(), 0u8);
        for (i, (x, y)) in [(5, 0), (1, 3), (0, 0), (7, 7), (2, 3)].into_iter().enumerate() {
            m.set_entity(Coordinate::new(x, y), i as u8 + 1);
        }
        m
    }

    fn noop(_: &GridCell<u8>, _: &mut Model, _: u64, _: &mut BasicStatistics) -> Result<(), StepError> {
        Ok(())
    }

    #[test]
    fn by_position_is_row_major() {
        let mut runner = AsynchronousStepRunner::new(seeded(), |e: &u8| *e > 0, AgentOrdering::ByPosition, noop);
        let order: Vec<u8> = runner.ordered_agents().into_iter().map(|c| c.entity).collect();
        assert_eq!(order, vec![3, 1, 2, 5, 4]);
    }

    #[test]
    fn custom_ordering_sorts_stably() {
        let descending: fn(&GridCell<u8>, &GridCell<u8>) -> Ordering = |a, b| b.entity.cmp(&a.entity);
        let mut runner = AsynchronousStepRunner::new(seeded(), |e: &u8| *e > 0, AgentOrdering::Custom(descending), noop);
        let order: Vec<u8> = runner.ordered_agents().into_iter().map(|c| c.entity).collect();
        assert_eq!(order, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn shuffle_is_reproducible_and_storage_independent() {
        let order = |sparse: bool, seed: u64| -> Vec<u8> {
            let rng = ChaCha8Rng::seed_from_u64(seed);
            if sparse {
                let mut m = SparseGridModel::new(structure(), 0u8);
                m.copy_from(&seeded()).unwrap();
                let mut r = AsynchronousStepRunner::new(
                    m,
                    |e: &u8| *e > 0,
                    AgentOrdering::Shuffled(rng),
                    |_: &GridCell<u8>, _: &mut SparseGridModel<u8>, _: u64, _: &mut BasicStatistics| -> Result<(), StepError> {
                        Ok(())
                    },
                );
                r.ordered_agents().into_iter().map(|c| c.entity).collect()
            } else {
                let mut r = AsynchronousStepRunner::new(seeded(), |e: &u8| *e > 0, AgentOrdering::Shuffled(rng), noop);
                r.ordered_agents().into_iter().map(|c| c.entity).collect()
            }
        };
        assert_eq!(order(false, 11), order(false, 11));
        assert_eq!(order(false, 11), order(true, 11));
        let mut sorted = order(false, 11);
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn later_agents_see_earlier_moves() {
        // Every agent moves right if the cell is free. In row-major order
        // the agent at (1,3) finds (2,3) occupied and stays put.
        let step = |agent: &GridCell<u8>, m: &mut Model, _: u64, _: &mut BasicStatistics| -> Result<(), StepError> {
            let target = Coordinate::new(agent.coordinate.x + 1, agent.coordinate.y);
            if m.structure().is_coordinate_valid(target) && m.is_default_entity(target) {
                m.swap_entities(agent.coordinate, target);
            }
            Ok(())
        };
        let mut runner = AsynchronousStepRunner::new(seeded(), |e: &u8| *e > 0, AgentOrdering::ByPosition, step);
        let mut stats = BasicStatistics::default();
        runner.perform_step(0, &mut stats).unwrap();
        let m = runner.current_model();
        assert_eq!(m.entity(Coordinate::new(1, 3)), &2);
        assert_eq!(m.entity(Coordinate::new(3, 3)), &5);
        assert_eq!(m.entity(Coordinate::new(7, 7)), &4);
        assert_eq!(m.non_default_count(), 5);
    }

    #[test]
    fn error_stops_mid_step_without_rollback() {
        let mut seen = 0;
        let step = |agent: &GridCell<u8>, m: &mut Model, _: u64, _: &mut BasicStatistics| -> Result<(), StepError> {
            seen += 1;
            if agent.entity == 1 {
                return Err(StepError::logic("agent 1 failed"));
            }
            m.set_entity_to_default(agent.coordinate);
            Ok(())
        };
        let mut runner = AsynchronousStepRunner::new(seeded(), |e: &u8| *e > 0, AgentOrdering::ByPosition, step);
        let mut stats = BasicStatistics::default();
        assert!(runner.perform_step(0, &mut stats).is_err());
        // (0,0) acted before (5,0) failed.
        assert_eq!(runner.current_model().non_default_count(), 4);
        drop(runner);
        assert_eq!(seen, 2);
    }
}
