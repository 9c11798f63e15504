//! Conway-style life on any cell shape.
//!
//! Each generation is computed synchronously: a cell's next state depends
//! only on its own state and the number of alive cells among its
//! [`valid_neighbor_coordinates`] in the previous generation.
//!
//! ```
//! use tessera_engine::SimulationManager;
//! use tessera_sims::conway::ConwayConfig;
//!
//! let mut sim = ConwayConfig::default().build().unwrap();
//! let alive_before = sim.statistics().alive;
//! sim.execute_steps(10, &mut |_| {}).unwrap();
//! assert!(alive_before > 0);
//! assert!(sim.step_count() <= 10);
//! ```

use std::fmt;
use std::str::FromStr;

use log::debug;
use tessera_core::{GridEntity, Offset, StepError};
use tessera_engine::{
    ConfigError, DefaultSimulationExecutor, Simulation, SimulationConfig, SimulationStatistics,
    StepTimingStatistics, SynchronousStepLogic, SynchronousStepRunner, TerminationCondition,
    TimedSimulationExecutor,
};
use tessera_grid::init::{self, GridInitializer};
use tessera_grid::{GridPattern, GridStore, ModelError, ReadableGridModel, WritableGridModel};
use tessera_space::neighborhood::valid_neighbor_coordinates;
use tessera_space::{CellShape, GridEdgeBehavior, NeighborhoodMode};

use crate::error::RuleError;

const INIT_STREAM: u64 = 1;

// ── Entity ─────────────────────────────────────────────────────────

/// State of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConwayEntity {
    /// The default.
    #[default]
    Dead,
    /// A live cell.
    Alive,
}

impl ConwayEntity {
    /// Whether the cell is alive.
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

impl GridEntity for ConwayEntity {
    fn descriptor_id(&self) -> &'static str {
        match self {
            Self::Dead => "dead",
            Self::Alive => "alive",
        }
    }
}

// ── Rules ──────────────────────────────────────────────────────────

/// Survive and birth neighbour counts, written `"S/B"` (e.g. `"23/3"`).
///
/// Counts are single decimal digits; a count above 9 never matches.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConwayRules {
    survive: u16,
    birth: u16,
}

impl ConwayRules {
    /// Rules from explicit count lists.
    ///
    /// # Errors
    ///
    /// [`RuleError::CountOutOfRange`] for a count above 9.
    pub fn new(survive: &[u8], birth: &[u8]) -> Result<Self, RuleError> {
        let mask = |counts: &[u8]| {
            counts.iter().try_fold(0u16, |mask, &n| {
                if n > 9 {
                    Err(RuleError::CountOutOfRange { count: n })
                } else {
                    Ok(mask | (1 << n))
                }
            })
        };
        Ok(Self {
            survive: mask(survive)?,
            birth: mask(birth)?,
        })
    }

    /// The classic B3/S23 rules.
    pub const fn classic() -> Self {
        Self {
            survive: (1 << 2) | (1 << 3),
            birth: 1 << 3,
        }
    }

    /// Sensible defaults per cell shape: square 23/3, hexagon 23/34,
    /// triangle 45/456.
    pub const fn for_shape(shape: CellShape) -> Self {
        match shape {
            CellShape::Square => Self::classic(),
            CellShape::Hexagon => Self {
                survive: (1 << 2) | (1 << 3),
                birth: (1 << 3) | (1 << 4),
            },
            CellShape::Triangle => Self {
                survive: (1 << 4) | (1 << 5),
                birth: (1 << 4) | (1 << 5) | (1 << 6),
            },
        }
    }

    /// Whether a live cell with `alive_neighbors` survives.
    pub const fn survives(&self, alive_neighbors: usize) -> bool {
        alive_neighbors < 10 && self.survive & (1 << alive_neighbors) != 0
    }

    /// Whether a dead cell with `alive_neighbors` comes alive.
    pub const fn is_born(&self, alive_neighbors: usize) -> bool {
        alive_neighbors < 10 && self.birth & (1 << alive_neighbors) != 0
    }

    /// Next state of a cell.
    pub const fn next_state(&self, current: ConwayEntity, alive_neighbors: usize) -> ConwayEntity {
        let alive = match current {
            ConwayEntity::Alive => self.survives(alive_neighbors),
            ConwayEntity::Dead => self.is_born(alive_neighbors),
        };
        if alive {
            ConwayEntity::Alive
        } else {
            ConwayEntity::Dead
        }
    }

    fn write_mask(f: &mut fmt::Formatter<'_>, mask: u16) -> fmt::Result {
        for n in 0..10u32 {
            if mask & (1 << n) != 0 {
                if let Some(digit) = char::from_digit(n, 10) {
                    write!(f, "{digit}")?;
                }
            }
        }
        Ok(())
    }
}

impl Default for ConwayRules {
    fn default() -> Self {
        Self::classic()
    }
}

impl FromStr for ConwayRules {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule = s.trim();
        let (survive, birth) = rule.split_once('/').ok_or_else(|| RuleError::MissingSeparator {
            rule: rule.to_owned(),
        })?;
        let mask = |part: &str| {
            part.chars().try_fold(0u16, |mask, c| match c.to_digit(10) {
                Some(n) => Ok(mask | (1 << n)),
                None => Err(RuleError::InvalidCharacter {
                    rule: rule.to_owned(),
                    character: c,
                }),
            })
        };
        Ok(Self {
            survive: mask(survive)?,
            birth: mask(birth)?,
        })
    }
}

impl fmt::Display for ConwayRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_mask(f, self.survive)?;
        f.write_str("/")?;
        Self::write_mask(f, self.birth)
    }
}

impl fmt::Debug for ConwayRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConwayRules({self})")
    }
}

// ── Statistics ─────────────────────────────────────────────────────

/// Population counts of a life run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConwayStatistics {
    /// Number of cells in the grid.
    pub total_cells: usize,
    /// Live cells after the last step.
    pub alive: usize,
    /// Dead cells after the last step.
    pub dead: usize,
    /// Largest live population seen, including the initial one.
    pub max_alive: usize,
    /// Cells whose state changed in the last step.
    pub changed_cells: usize,
    step_count: u64,
    timing: StepTimingStatistics,
}

impl ConwayStatistics {
    /// Statistics for a grid of `total_cells` cells holding `alive` live
    /// cells before the first step.
    pub fn new(total_cells: usize, alive: usize) -> Self {
        Self {
            total_cells,
            alive,
            dead: total_cells.saturating_sub(alive),
            max_alive: alive,
            ..Self::default()
        }
    }

    fn record_generation(&mut self, alive: usize, changed: usize) {
        self.alive = alive;
        self.dead = self.total_cells.saturating_sub(alive);
        self.max_alive = self.max_alive.max(alive);
        self.changed_cells = changed;
    }
}

impl SimulationStatistics for ConwayStatistics {
    fn update(&mut self, step_count: u64, timing: &StepTimingStatistics) {
        self.step_count = step_count;
        self.timing = *timing;
    }

    fn step_count(&self) -> u64 {
        self.step_count
    }

    fn timing(&self) -> &StepTimingStatistics {
        &self.timing
    }
}

// ── Logic ──────────────────────────────────────────────────────────

/// One synchronous life generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConwayLogic {
    rules: ConwayRules,
    mode: NeighborhoodMode,
}

impl ConwayLogic {
    /// Logic applying `rules` over `mode` neighbourhoods.
    pub const fn new(rules: ConwayRules, mode: NeighborhoodMode) -> Self {
        Self { rules, mode }
    }

    /// The rules in use.
    pub const fn rules(&self) -> ConwayRules {
        self.rules
    }
}

impl<M> SynchronousStepLogic<M, ConwayStatistics> for ConwayLogic
where
    M: WritableGridModel<ConwayEntity>,
{
    fn perform_step(
        &mut self,
        current: &M,
        next: &mut M,
        _step_index: u64,
        statistics: &mut ConwayStatistics,
    ) -> Result<(), StepError> {
        let structure = current.structure();
        let mut alive = 0;
        let mut changed = 0;
        for coordinate in structure.coordinates() {
            let was = *current.entity(coordinate);
            let neighbors = valid_neighbor_coordinates(coordinate, self.mode, structure)
                .into_iter()
                .filter(|&n| current.entity(n).is_alive())
                .count();
            let now = self.rules.next_state(was, neighbors);
            if now != was {
                changed += 1;
            }
            // `next` starts cleared, so only live cells need writing.
            if now.is_alive() {
                alive += 1;
                next.set_entity(coordinate, now);
            }
        }
        statistics.record_generation(alive, changed);
        Ok(())
    }
}

// ── Termination ────────────────────────────────────────────────────

/// When a life run is over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConwayTermination {
    /// No live cell is left.
    Extinction,
    /// The last step changed nothing.
    Stable,
    /// Either of the above.
    #[default]
    ExtinctionOrStable,
}

impl<M: ?Sized> TerminationCondition<M, ConwayStatistics> for ConwayTermination {
    fn is_finished(&self, _model: &M, _step_count: u64, statistics: &ConwayStatistics) -> bool {
        let extinct = statistics.alive == 0;
        let stable = statistics.changed_cells == 0;
        match self {
            Self::Extinction => extinct,
            Self::Stable => stable,
            Self::ExtinctionOrStable => extinct || stable,
        }
    }
}

// ── Patterns ───────────────────────────────────────────────────────

/// Well-known life patterns, anchored at their top-left corner.
pub mod patterns {
    use super::*;

    fn alive_at(cells: &[(i32, i32)]) -> GridPattern<ConwayEntity> {
        GridPattern::from_offsets(
            ConwayEntity::Alive,
            cells.iter().map(|&(dx, dy)| Offset::new(dx, dy)),
        )
    }

    /// The square-grid glider, travelling towards +x +y.
    pub fn glider() -> GridPattern<ConwayEntity> {
        alive_at(&[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)])
    }

    /// 2×2 still life.
    pub fn block() -> GridPattern<ConwayEntity> {
        alive_at(&[(0, 0), (1, 0), (0, 1), (1, 1)])
    }

    /// Horizontal period-2 oscillator.
    pub fn blinker() -> GridPattern<ConwayEntity> {
        GridPattern::horizontal_line(ConwayEntity::Alive, 3)
    }

    /// Six-cell still life.
    pub fn beehive() -> GridPattern<ConwayEntity> {
        alive_at(&[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (2, 2)])
    }
}

// ── Config & assembly ──────────────────────────────────────────────

/// Model type of a life run.
pub type ConwayModel = GridStore<ConwayEntity>;
/// Runner type of a life run.
pub type ConwayRunner = SynchronousStepRunner<ConwayEntity, ConwayModel, ConwayStatistics, ConwayLogic>;
/// Executor type of a life run.
pub type ConwayExecutor = DefaultSimulationExecutor<ConwayRunner, ConwayTermination>;
/// A fully assembled life run.
pub type ConwaySimulation = Simulation<ConwayExecutor>;
/// A life run whose slow steps pause it.
pub type TimedConwaySimulation = Simulation<TimedSimulationExecutor<ConwayRunner, ConwayTermination>>;

/// Everything needed to build a life run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConwayConfig {
    /// Grid, seed and timing parameters.
    pub base: SimulationConfig,
    /// Survive and birth counts.
    pub rules: ConwayRules,
    /// Fraction of cells placed alive at random by [`build`](Self::build).
    pub alive_percent: f64,
    /// When the run stops.
    pub termination: ConwayTermination,
}

impl Default for ConwayConfig {
    fn default() -> Self {
        Self::for_shape(CellShape::Square)
    }
}

impl ConwayConfig {
    /// Defaults for `shape`: a wrapping 32×32 grid with the shape's rules.
    pub fn for_shape(shape: CellShape) -> Self {
        Self {
            base: SimulationConfig {
                cell_shape: shape,
                edge_behavior: GridEdgeBehavior::WRAP_XY,
                ..SimulationConfig::default()
            },
            rules: ConwayRules::for_shape(shape),
            alive_percent: 0.15,
            termination: ConwayTermination::default(),
        }
    }

    /// Check the base config and the alive percentage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        if !(0.0..=1.0).contains(&self.alive_percent) {
            return Err(ConfigError::invalid(
                "alive_percent",
                format!("must be within 0..=1, got {}", self.alive_percent),
            ));
        }
        Ok(())
    }

    /// Build a run seeded with `alive_percent` random live cells.
    pub fn build(&self) -> Result<ConwaySimulation, ConfigError> {
        Simulation::new(self.base.clone(), self.executor(&mut self.random_fill())?)
    }

    /// Build a run whose initial cells come from `initializer`.
    pub fn build_with(&self, initializer: &mut dyn GridInitializer<ConwayEntity>) -> Result<ConwaySimulation, ConfigError> {
        Simulation::new(self.base.clone(), self.executor(initializer)?)
    }

    /// Like [`build`](Self::build), pausing after steps slower than the
    /// configured budget.
    pub fn build_timed(&self) -> Result<TimedConwaySimulation, ConfigError> {
        let executor = self.executor(&mut self.random_fill())?;
        let timed = TimedSimulationExecutor::from_config(executor, &self.base)?;
        Simulation::new(self.base.clone(), timed)
    }

    fn random_fill(&self) -> impl GridInitializer<ConwayEntity> {
        let mut rng = self.base.rng_stream(INIT_STREAM);
        let percent = self.alive_percent;
        move |model: &mut dyn WritableGridModel<ConwayEntity>| -> Result<(), ModelError> {
            init::place_random_percent(model, percent, || ConwayEntity::Alive, &mut rng)?;
            Ok(())
        }
    }

    fn executor(&self, initializer: &mut dyn GridInitializer<ConwayEntity>) -> Result<ConwayExecutor, ConfigError> {
        self.validate()?;
        let structure = self.base.structure()?;
        let mut model = GridStore::new(self.base.storage, structure, ConwayEntity::Dead);
        initializer.initialize(&mut model)?;

        let alive = model.non_default_count();
        debug!("life {} on {structure}: {alive} alive", self.rules);
        let statistics = ConwayStatistics::new(structure.cell_count(), alive);
        let runner = SynchronousStepRunner::new(model, ConwayLogic::new(self.rules, self.base.neighborhood_mode));
        Ok(DefaultSimulationExecutor::new(runner, self.termination, statistics))
    }
}
