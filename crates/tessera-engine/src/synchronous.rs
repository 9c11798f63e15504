//! Double-buffered synchronous stepping.
//!
//! [`SynchronousStepRunner`] owns two preallocated models. Each step the
//! logic reads only `current` and writes `next`; the two are then swapped
//! and the stale buffer is cleared. No cell can observe another cell's
//! value from the generation being computed.

use std::marker::PhantomData;
use std::mem;

use tessera_core::{Coordinate, GridEntity, StepError};
use tessera_grid::WritableGridModel;

use crate::runner::StepRunner;
use crate::statistics::SimulationStatistics;

/// Logic computing generation `n + 1` from generation `n`.
///
/// `next` is all-default on entry. Implemented for matching closures.
pub trait SynchronousStepLogic<M, S> {
    /// Fill `next` from `current`.
    ///
    /// # Errors
    ///
    /// A [`StepError`] aborts the step. The runner discards `next`.
    fn perform_step(&mut self, current: &M, next: &mut M, step_index: u64, statistics: &mut S)
        -> Result<(), StepError>;
}

impl<M, S, F> SynchronousStepLogic<M, S> for F
where
    F: FnMut(&M, &mut M, u64, &mut S) -> Result<(), StepError>,
{
    fn perform_step(
        &mut self,
        current: &M,
        next: &mut M,
        step_index: u64,
        statistics: &mut S,
    ) -> Result<(), StepError> {
        self(current, next, step_index, statistics)
    }
}

/// Adapter evaluating a pure per-cell transition over every coordinate.
///
/// Built by [`PerCell::new`]; the transition sees the coordinate, the
/// whole current generation and the statistics, and returns the cell's
/// next entity.
#[derive(Clone, Debug)]
pub struct PerCell<F> {
    transition: F,
}

impl<F> PerCell<F> {
    /// Wrap a per-cell `transition`.
    pub fn new(transition: F) -> Self {
        Self { transition }
    }
}

impl<T, M, S, F> SynchronousStepLogic<M, S> for PerCell<F>
where
    T: GridEntity,
    M: WritableGridModel<T>,
    F: FnMut(Coordinate, &M, &mut S) -> T,
{
    fn perform_step(&mut self, current: &M, next: &mut M, _step_index: u64, statistics: &mut S) -> Result<(), StepError> {
        for c in current.structure().coordinates() {
            let entity = (self.transition)(c, current, statistics);
            next.set_entity(c, entity);
        }
        Ok(())
    }
}

/// Runner holding a current and a next model.
///
/// # Example
///
/// ```
/// use tessera_core::{Coordinate, StepError};
/// use tessera_engine::{BasicStatistics, StepRunner, SynchronousStepRunner};
/// use tessera_grid::{DenseGridModel, ReadableGridModel, WritableGridModel};
/// use tessera_space::{CellShape, GridEdgeBehavior, GridStructure};
///
/// let structure = GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::WRAP_XY, 8, 8).unwrap();
/// let mut model = DenseGridModel::new(structure, 0u8);
/// model.set_entity(Coordinate::new(0, 0), 1);
///
/// // Shift every entity one cell to the right.
/// let shift = |current: &DenseGridModel<u8>, next: &mut DenseGridModel<u8>, _: u64, _: &mut BasicStatistics| {
///     for cell in current.non_default_cells() {
///         let target = Coordinate::new((cell.coordinate.x + 1) % 8, cell.coordinate.y);
///         next.set_entity(target, *cell.entity);
///     }
///     Ok::<(), StepError>(())
/// };
/// let mut runner = SynchronousStepRunner::new(model, shift);
/// let mut stats = BasicStatistics::default();
/// runner.perform_step(0, &mut stats).unwrap();
/// assert_eq!(runner.current_model().entity(Coordinate::new(1, 0)), &1);
/// ```
pub struct SynchronousStepRunner<T, M, S, L> {
    current: M,
    next: M,
    logic: L,
    _marker: PhantomData<fn() -> (T, S)>,
}

impl<T, M, S, L> SynchronousStepRunner<T, M, S, L>
where
    T: GridEntity,
    M: WritableGridModel<T> + Clone,
    S: SimulationStatistics,
    L: SynchronousStepLogic<M, S>,
{
    /// Runner starting from `initial`. The second buffer is an all-default
    /// clone of it, allocated once here.
    pub fn new(initial: M, logic: L) -> Self {
        let mut next = initial.clone();
        next.clear();
        Self {
            current: initial,
            next,
            logic,
            _marker: PhantomData,
        }
    }

    /// The step logic.
    pub fn logic(&self) -> &L {
        &self.logic
    }

    /// Mutable access to the current model between steps, for seeding or
    /// interactive edits.
    pub fn current_model_mut(&mut self) -> &mut M {
        &mut self.current
    }
}

impl<T, M, S, L> StepRunner for SynchronousStepRunner<T, M, S, L>
where
    T: GridEntity,
    M: WritableGridModel<T> + Clone,
    S: SimulationStatistics,
    L: SynchronousStepLogic<M, S>,
{
    type Entity = T;
    type Model = M;
    type Statistics = S;

    fn perform_step(&mut self, step_index: u64, statistics: &mut S) -> Result<(), StepError> {
        if let Err(e) = self
            .logic
            .perform_step(&self.current, &mut self.next, step_index, statistics)
        {
            self.next.clear();
            return Err(e);
        }
        mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
        Ok(())
    }

    fn current_model(&self) -> &M {
        &self.current
    }
}

impl<T, M: std::fmt::Debug, S, L> std::fmt::Debug for SynchronousStepRunner<T, M, S, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynchronousStepRunner")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
