//! Sugarscape: agents foraging on a landscape of regrowing sugar.
//!
//! Sugar is laid out in hills around one to five peaks. Each step every
//! agent, in a freshly shuffled order, looks across free cells up to its
//! vision range, walks one step towards the richest cell it saw, harvests
//! everything on the cell it ends on and burns its metabolism. Agents die
//! when their energy runs out or they reach the maximum age. After all
//! agents have acted, every depleted patch regrows towards its capacity.

use std::collections::HashSet;

use log::debug;
use tessera_core::{Coordinate, GridEntity, StepError};
use tessera_engine::{
    AgentOrdering, AgentStepLogic, AsynchronousStepRunner, ConfigError, DefaultSimulationExecutor,
    Simulation, SimulationConfig, SimulationStatistics, StepRunner, StepTimingStatistics,
    TerminationCondition, TimedSimulationExecutor,
};
use tessera_grid::init;
use tessera_grid::{GridCell, GridStore, ReadableGridModel, WritableGridModel};
use tessera_space::neighborhood::valid_neighbor_coordinates;
use tessera_space::{GridEdgeBehavior, GridSize, GridStructure, NeighborhoodMode};

const INIT_STREAM: u64 = 1;
const ORDER_STREAM: u64 = 2;

/// Upper bound of every integer parameter.
pub const MAX_PARAMETER: u32 = 1_000;

/// Largest supported number of sugar peaks.
pub const MAX_PEAKS: u32 = 5;

// ── Entities ───────────────────────────────────────────────────────

/// A sugar patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sugar {
    /// Sugar available now.
    pub amount: u32,
    /// The patch never regrows beyond this.
    pub capacity: u32,
}

impl Sugar {
    /// A patch filled to `capacity`.
    pub const fn full(capacity: u32) -> Self {
        Self {
            amount: capacity,
            capacity,
        }
    }
}

/// A foraging agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SugarAgent {
    /// Unique within a run.
    pub id: u64,
    /// Index of the step the agent was born in; 0 for the initial
    /// population.
    pub born_at: u64,
    /// Stored sugar.
    pub energy: u32,
}

impl SugarAgent {
    /// An agent born during step `born_at`.
    pub const fn new(id: u64, born_at: u64, energy: u32) -> Self {
        Self { id, born_at, energy }
    }

    /// Age during step `step_index`.
    pub const fn age_at(&self, step_index: u64) -> u64 {
        step_index.saturating_sub(self.born_at)
    }
}

/// Sugar and occupant of one cell. The default is barren and empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SugarCell {
    /// `None` outside the sugar hills.
    pub sugar: Option<Sugar>,
    /// The agent standing here, if any.
    pub agent: Option<SugarAgent>,
}

impl SugarCell {
    /// An agent on barren ground.
    pub const fn with_agent(agent: SugarAgent) -> Self {
        Self {
            sugar: None,
            agent: Some(agent),
        }
    }

    /// A full patch without an agent.
    pub const fn with_sugar(capacity: u32) -> Self {
        Self {
            sugar: Some(Sugar::full(capacity)),
            agent: None,
        }
    }

    /// Whether an agent stands here.
    pub const fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// Sugar available here, 0 on barren ground.
    pub fn sugar_amount(&self) -> u32 {
        self.sugar.map_or(0, |s| s.amount)
    }
}

impl GridEntity for SugarCell {
    fn descriptor_id(&self) -> &'static str {
        match (self.agent, self.sugar) {
            (Some(_), _) => "agent",
            (None, Some(_)) => "sugar",
            (None, None) => "barren",
        }
    }
}

// ── Statistics ─────────────────────────────────────────────────────

/// Counts of a Sugarscape run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SugarStatistics {
    /// Number of cells in the grid.
    pub total_cells: usize,
    /// Cells carrying a sugar patch. Fixed after initialization.
    pub sugar_cells: usize,
    /// Agents alive now.
    pub agents: usize,
    /// Largest population after any step, including the initial one.
    pub max_agents: usize,
    /// Sugar lying on the grid now.
    pub sugar: u64,
    /// Sugar harvested since the start.
    pub harvested: u64,
    step_count: u64,
    timing: StepTimingStatistics,
}

impl SugarStatistics {
    /// Statistics for the initial landscape and population.
    pub fn new(total_cells: usize, sugar_cells: usize, agents: usize, sugar: u64) -> Self {
        Self {
            total_cells,
            sugar_cells,
            agents,
            max_agents: agents,
            sugar,
            ..Self::default()
        }
    }
}

impl SimulationStatistics for SugarStatistics {
    fn update(&mut self, step_count: u64, timing: &StepTimingStatistics) {
        self.step_count = step_count;
        self.timing = *timing;
        self.max_agents = self.max_agents.max(self.agents);
    }

    fn step_count(&self) -> u64 {
        self.step_count
    }

    fn timing(&self) -> &StepTimingStatistics {
        &self.timing
    }
}

// ── Landscape ──────────────────────────────────────────────────────

/// Maps `fraction` of `size` to an index in `0..size`, rounding down
/// below one half and up from one half.
fn fraction_to_index(size: i32, fraction: f64) -> i32 {
    let scaled = f64::from(size) * fraction;
    let index = if fraction < 0.5 { scaled.floor() } else { scaled.ceil() };
    (index as i32).clamp(0, size - 1)
}

/// Peak positions for `count` peaks on a grid of `size`.
///
/// An odd count puts one peak in the centre. Two or more add the
/// anti-diagonal pair at the quarter points, four or more the diagonal
/// pair. Counts above [`MAX_PEAKS`] behave like [`MAX_PEAKS`].
pub fn sugar_peaks(size: GridSize, count: u32) -> Vec<Coordinate> {
    let at = |fx: f64, fy: f64| {
        Coordinate::new(
            fraction_to_index(size.width(), fx),
            fraction_to_index(size.height(), fy),
        )
    };
    let mut peaks = Vec::new();
    if count % 2 == 1 {
        peaks.push(at(0.5, 0.5));
    }
    if count >= 2 {
        peaks.push(at(0.75, 0.25));
        peaks.push(at(0.25, 0.75));
    }
    if count >= 4 {
        peaks.push(at(0.25, 0.25));
        peaks.push(at(0.75, 0.75));
    }
    peaks
}

/// Patch capacities around `peaks`, in breadth-first order.
///
/// Peaks get `max_sugar`. Cells `r` rings away get a capacity falling
/// linearly from `max_sugar` towards `min_sugar` at `radius_limit`;
/// cells further out stay barren. A cell reachable from several peaks
/// belongs to the one that reached it first.
pub fn sugar_landscape(
    structure: &GridStructure,
    mode: NeighborhoodMode,
    peaks: &[Coordinate],
    radius_limit: u32,
    min_sugar: u32,
    max_sugar: u32,
) -> Vec<(Coordinate, u32)> {
    let max_sugar = max_sugar.max(min_sugar);
    let range = max_sugar - min_sugar;
    let mut seen: HashSet<Coordinate> = HashSet::new();
    let mut landscape = Vec::new();
    let mut ring = Vec::new();
    for &peak in peaks {
        if structure.is_coordinate_valid(peak) && seen.insert(peak) {
            landscape.push((peak, max_sugar));
            ring.push(peak);
        }
    }
    for level in 1..=radius_limit {
        let capacity = min_sugar + range * (radius_limit - level) / radius_limit;
        let mut next = Vec::new();
        for &cell in &ring {
            for neighbor in valid_neighbor_coordinates(cell, mode, structure) {
                if seen.insert(neighbor) {
                    landscape.push((neighbor, capacity));
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        ring = next;
    }
    landscape
}

// ── Config ─────────────────────────────────────────────────────────

/// Everything needed to build a Sugarscape run.
#[derive(Clone, Debug, PartialEq)]
pub struct SugarConfig {
    /// Grid, seed and timing parameters. The neighbourhood mode shapes
    /// both the sugar hills and what agents see.
    pub base: SimulationConfig,
    /// Fraction of cells holding an agent at the start.
    pub agent_percent: f64,
    /// Number of sugar peaks, `0..=MAX_PEAKS`.
    pub sugar_peaks: u32,
    /// Rings of sugar around each peak.
    pub sugar_radius_limit: u32,
    /// Capacity of the outermost ring.
    pub min_sugar: u32,
    /// Capacity of a peak.
    pub max_sugar: u32,
    /// Energy of every initial agent.
    pub agent_initial_energy: u32,
    /// Sugar every depleted patch regains per step.
    pub sugar_regrowth_rate: u32,
    /// Energy every agent burns per step.
    pub agent_metabolism: u32,
    /// How many rings of free cells an agent looks across.
    pub agent_vision: u32,
    /// An agent dies at this age.
    pub agent_max_age: u32,
}

impl Default for SugarConfig {
    fn default() -> Self {
        Self {
            base: SimulationConfig {
                edge_behavior: GridEdgeBehavior::BLOCK_XY,
                neighborhood_mode: NeighborhoodMode::EdgesOnly,
                ..SimulationConfig::default()
            },
            agent_percent: 0.10,
            sugar_peaks: 2,
            sugar_radius_limit: 10,
            min_sugar: 1,
            max_sugar: 4,
            agent_initial_energy: 5,
            sugar_regrowth_rate: 1,
            agent_metabolism: 1,
            agent_vision: 2,
            agent_max_age: 100,
        }
    }
}

impl SugarConfig {
    /// Check the base config, the agent percentage, the peak count and
    /// every integer parameter against its range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        if !(0.0..=1.0).contains(&self.agent_percent) {
            return Err(ConfigError::invalid(
                "agent_percent",
                format!("must be within 0..=1, got {}", self.agent_percent),
            ));
        }
        if self.sugar_peaks > MAX_PEAKS {
            return Err(ConfigError::invalid(
                "sugar_peaks",
                format!("must be within 0..={MAX_PEAKS}, got {}", self.sugar_peaks),
            ));
        }
        if self.sugar_radius_limit > MAX_PARAMETER {
            return Err(ConfigError::invalid(
                "sugar_radius_limit",
                format!("must be within 0..={MAX_PARAMETER}, got {}", self.sugar_radius_limit),
            ));
        }
        let parameters = [
            ("max_sugar", self.max_sugar),
            ("agent_initial_energy", self.agent_initial_energy),
            ("sugar_regrowth_rate", self.sugar_regrowth_rate),
            ("agent_metabolism", self.agent_metabolism),
            ("agent_vision", self.agent_vision),
            ("agent_max_age", self.agent_max_age),
        ];
        for (name, value) in parameters {
            if !(1..=MAX_PARAMETER).contains(&value) {
                return Err(ConfigError::invalid(
                    name,
                    format!("must be within 1..={MAX_PARAMETER}, got {value}"),
                ));
            }
        }
        if !(1..=self.max_sugar).contains(&self.min_sugar) {
            return Err(ConfigError::invalid(
                "min_sugar",
                format!("must be within 1..={}, got {}", self.max_sugar, self.min_sugar),
            ));
        }
        Ok(())
    }

    /// Build a run with sugar hills and randomly placed agents.
    pub fn build(&self) -> Result<SugarSimulation, ConfigError> {
        Simulation::new(self.base.clone(), self.executor()?)
    }

    /// Like [`build`](Self::build), pausing after steps slower than the
    /// configured budget.
    pub fn build_timed(&self) -> Result<TimedSugarSimulation, ConfigError> {
        let timed = TimedSimulationExecutor::from_config(self.executor()?, &self.base)?;
        Simulation::new(self.base.clone(), timed)
    }

    fn executor(&self) -> Result<SugarExecutor, ConfigError> {
        self.validate()?;
        let structure = self.base.structure()?;
        let mut model = GridStore::new(self.base.storage, structure, SugarCell::default());
        let mut rng = self.base.rng_stream(INIT_STREAM);
        let mut next_id = 0u64;
        let energy = self.agent_initial_energy;
        let agents = init::place_random_percent(
            &mut model,
            self.agent_percent,
            || {
                let id = next_id;
                next_id += 1;
                SugarCell::with_agent(SugarAgent::new(id, 0, energy))
            },
            &mut rng,
        )?;

        let peaks = sugar_peaks(structure.size(), self.sugar_peaks);
        let landscape = sugar_landscape(
            &structure,
            self.base.neighborhood_mode,
            &peaks,
            self.sugar_radius_limit,
            self.min_sugar,
            self.max_sugar,
        );
        let mut sugar = 0u64;
        for &(coordinate, capacity) in &landscape {
            let cell = *model.entity(coordinate);
            model.set_entity(
                coordinate,
                SugarCell {
                    sugar: Some(Sugar::full(capacity)),
                    ..cell
                },
            );
            sugar += u64::from(capacity);
        }
        debug!(
            "sugarscape on {structure}: {agents} agents, {} peaks, {} sugar cells",
            peaks.len(),
            landscape.len()
        );

        let runner = SugarRunner::new(
            model,
            AgentOrdering::Shuffled(self.base.rng_stream(ORDER_STREAM)),
            SugarLogic::new(self),
            self.sugar_regrowth_rate,
        );
        let statistics = SugarStatistics::new(structure.cell_count(), landscape.len(), agents, sugar);
        Ok(DefaultSimulationExecutor::new(runner, SugarTermination, statistics))
    }
}

// ── Logic ──────────────────────────────────────────────────────────

/// One agent's turn.
#[derive(Clone, Debug)]
pub struct SugarLogic {
    mode: NeighborhoodMode,
    vision: u32,
    metabolism: u32,
    max_age: u32,
}

impl SugarLogic {
    /// Logic using the agent parameters of `config`.
    pub fn new(config: &SugarConfig) -> Self {
        Self {
            mode: config.base.neighborhood_mode,
            vision: config.agent_vision,
            metabolism: config.agent_metabolism,
            max_age: config.agent_max_age,
        }
    }

    /// The cell an agent on `from` steps to: the first step towards the
    /// richest free cell within vision.
    ///
    /// Rings are scanned outwards and only a strictly richer cell replaces
    /// the current choice, so ties go to the own cell, then to the
    /// nearest ring, then to the first cell found in neighbour order.
    /// Occupied cells are neither targets nor passable.
    fn next_step<M>(&self, from: Coordinate, model: &M) -> Coordinate
    where
        M: ReadableGridModel<SugarCell>,
    {
        let structure = *model.structure();
        let mut best = (model.entity(from).sugar_amount(), from);
        let mut seen = HashSet::from([from]);
        let mut ring = vec![(from, from)];
        for _ in 0..self.vision {
            let mut next = Vec::new();
            for &(cell, first) in &ring {
                for neighbor in valid_neighbor_coordinates(cell, self.mode, &structure) {
                    if !seen.insert(neighbor) || model.entity(neighbor).has_agent() {
                        continue;
                    }
                    let step = if cell == from { neighbor } else { first };
                    let amount = model.entity(neighbor).sugar_amount();
                    if amount > best.0 {
                        best = (amount, step);
                    }
                    next.push((neighbor, step));
                }
            }
            if next.is_empty() {
                break;
            }
            ring = next;
        }
        best.1
    }
}

impl<M> AgentStepLogic<SugarCell, M, SugarStatistics> for SugarLogic
where
    M: WritableGridModel<SugarCell>,
{
    fn perform_agent_step(
        &mut self,
        agent: &GridCell<SugarCell>,
        model: &mut M,
        step_index: u64,
        statistics: &mut SugarStatistics,
    ) -> Result<(), StepError> {
        let from = agent.coordinate;
        let departure = *model.entity(from);
        let snapshot_id = agent.entity.agent.map(|a| a.id);
        let Some(mut forager) = departure.agent.filter(|a| Some(a.id) == snapshot_id) else {
            return Ok(());
        };

        let to = self.next_step(from, model);
        if to != from {
            model.set_entity(from, SugarCell { agent: None, ..departure });
        }

        let mut arrival = *model.entity(to);
        if let Some(sugar) = arrival.sugar.as_mut() {
            let harvest = sugar.amount;
            forager.energy = forager.energy.saturating_add(harvest);
            sugar.amount = 0;
            statistics.sugar = statistics.sugar.saturating_sub(u64::from(harvest));
            statistics.harvested += u64::from(harvest);
        }

        forager.energy = forager.energy.saturating_sub(self.metabolism);
        if forager.energy == 0 || forager.age_at(step_index) >= u64::from(self.max_age) {
            arrival.agent = None;
            statistics.agents = statistics.agents.saturating_sub(1);
        } else {
            arrival.agent = Some(forager);
        }
        model.set_entity(to, arrival);
        Ok(())
    }
}

// ── Runner ─────────────────────────────────────────────────────────

/// Agents act in order on the live model, then every depleted patch
/// regrows by the regrowth rate, capped at its capacity.
#[derive(Debug)]
pub struct SugarRunner<M = SugarModel> {
    agents: AsynchronousStepRunner<SugarCell, M, SugarStatistics, SugarLogic>,
    regrowth_rate: u32,
}

impl<M> SugarRunner<M>
where
    M: WritableGridModel<SugarCell>,
{
    /// Runner over `model` with agents acting in `ordering`.
    pub fn new(model: M, ordering: AgentOrdering<SugarCell>, logic: SugarLogic, regrowth_rate: u32) -> Self {
        Self {
            agents: AsynchronousStepRunner::new(model, SugarCell::has_agent, ordering, logic),
            regrowth_rate,
        }
    }

    /// The agent logic.
    pub fn logic(&self) -> &SugarLogic {
        self.agents.logic()
    }

    fn regrow(&mut self, statistics: &mut SugarStatistics) {
        let rate = self.regrowth_rate;
        let model = self.agents.current_model_mut();
        let depleted = model.find_cells(&|c: &SugarCell| c.sugar.is_some_and(|s| s.amount < s.capacity));
        for cell in depleted {
            let mut entity = cell.entity;
            if let Some(sugar) = entity.sugar.as_mut() {
                let grown = sugar.amount.saturating_add(rate).min(sugar.capacity);
                statistics.sugar += u64::from(grown - sugar.amount);
                sugar.amount = grown;
            }
            model.set_entity(cell.coordinate, entity);
        }
    }
}

impl<M> StepRunner for SugarRunner<M>
where
    M: WritableGridModel<SugarCell>,
{
    type Entity = SugarCell;
    type Model = M;
    type Statistics = SugarStatistics;

    fn perform_step(&mut self, step_index: u64, statistics: &mut SugarStatistics) -> Result<(), StepError> {
        self.agents.perform_step(step_index, statistics)?;
        self.regrow(statistics);
        Ok(())
    }

    fn current_model(&self) -> &M {
        self.agents.current_model()
    }
}

// ── Termination ────────────────────────────────────────────────────

/// A Sugarscape run ends when the last agent has died.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SugarTermination;

impl<M: ?Sized> TerminationCondition<M, SugarStatistics> for SugarTermination {
    fn is_finished(&self, _model: &M, _step_count: u64, statistics: &SugarStatistics) -> bool {
        statistics.agents == 0
    }
}

/// Model type of a Sugarscape run.
pub type SugarModel = GridStore<SugarCell>;
/// Executor type of a Sugarscape run.
pub type SugarExecutor = DefaultSimulationExecutor<SugarRunner, SugarTermination>;
/// A fully assembled Sugarscape run.
pub type SugarSimulation = Simulation<SugarExecutor>;
/// A Sugarscape run whose slow steps pause it.
pub type TimedSugarSimulation = Simulation<TimedSimulationExecutor<SugarRunner, SugarTermination>>;
