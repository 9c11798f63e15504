//! Langton's ant with multi-colour turn rules on any cell shape.
//!
//! Every step each ant, in row-major order, moves one cell through the
//! edge it faces. The ground it lands on decides the turn: colour `i`
//! applies the `i`-th turn of the rule, then advances to colour
//! `i + 1` modulo the number of turns. Unvisited ground counts as colour 0.
//!
//! An ant whose move leaves the grid (blocked or absorbed edge) is
//! removed. An ant whose target holds another ant waits.
//!
//! On triangles the facing direction alternates between the up-pointing
//! set (NE, S, NW) and the down-pointing set (N, SE, SW) with every move;
//! the allowed turns are exactly those that keep it on the new cell's
//! edges. A reflected move that keeps an ant on a cell of the same
//! orientation leaves it facing a vertex, and it is removed on its next
//! move.

use std::fmt;
use std::str::FromStr;

use log::debug;
use tessera_core::{Coordinate, GridEntity, StepError};
use tessera_engine::{
    AgentOrdering, AgentStepLogic, AsynchronousStepRunner, ConfigError, DefaultSimulationExecutor,
    Simulation, SimulationConfig, SimulationStatistics, StepTimingStatistics, TerminationCondition,
    TimedSimulationExecutor,
};
use tessera_grid::{GridCell, GridStore, ReadableGridModel, WritableGridModel};
use tessera_space::neighborhood::{cell_neighbor_directions, cell_neighbor_with_edge_behavior};
use tessera_space::{CellShape, CompassDirection, GridEdgeBehavior, GridStructure, NeighborhoodMode};

use crate::error::RuleError;

/// Edge directions of a square cell, clockwise.
pub const SQUARE_RING: [CompassDirection; 4] = [
    CompassDirection::N,
    CompassDirection::E,
    CompassDirection::S,
    CompassDirection::W,
];

/// Edge directions shared by hexagons and (alternately) triangles,
/// clockwise.
pub const SIX_RING: [CompassDirection; 6] = [
    CompassDirection::N,
    CompassDirection::NE,
    CompassDirection::SE,
    CompassDirection::S,
    CompassDirection::SW,
    CompassDirection::NW,
];

/// The ring an ant turns on for `shape`.
pub const fn edge_ring(shape: CellShape) -> &'static [CompassDirection] {
    match shape {
        CellShape::Square => &SQUARE_RING,
        CellShape::Triangle | CellShape::Hexagon => &SIX_RING,
    }
}

// ── Turns & rules ──────────────────────────────────────────────────

/// One turn of a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AntTurn {
    /// One ring position counter-clockwise.
    Left,
    /// One ring position clockwise.
    Right,
    /// Two ring positions counter-clockwise (hexagons).
    Left2,
    /// Two ring positions clockwise (hexagons).
    Right2,
    /// Keep going straight.
    NoTurn,
    /// Turn around.
    UTurn,
}

impl AntTurn {
    /// Rule-string symbol.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
            Self::Left2 => "L2",
            Self::Right2 => "R2",
            Self::NoTurn => "N",
            Self::UTurn => "U",
        }
    }

    /// Whether an ant on `shape` cells can make this turn.
    pub const fn is_allowed_on(self, shape: CellShape) -> bool {
        match shape {
            CellShape::Hexagon => true,
            CellShape::Square => matches!(self, Self::Left | Self::Right | Self::NoTurn | Self::UTurn),
            CellShape::Triangle => matches!(self, Self::Left | Self::Right | Self::UTurn),
        }
    }

    /// Signed number of positions along [`edge_ring`] this turn rotates.
    pub const fn ring_steps(self, shape: CellShape) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
            Self::Left2 => -2,
            Self::Right2 => 2,
            Self::NoTurn => 0,
            Self::UTurn => edge_ring(shape).len() as i32 / 2,
        }
    }
}

/// An ordered list of 2 to 16 turns, one per ground colour.
///
/// Parsed case-insensitively from strings such as `"RL"` or `"L2NNL1L2L1"`:
/// `L`/`L1`, `R`/`R1`, `L2`, `R2`, `N`/`C`/`F` (no turn), `U`/`B`
/// (u-turn).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LangtonRules {
    turns: Vec<AntTurn>,
}

impl LangtonRules {
    /// Fewest turns a rule may have.
    pub const MIN_TURNS: usize = 2;
    /// Most turns a rule may have.
    pub const MAX_TURNS: usize = 16;

    /// Rules from an explicit turn list.
    ///
    /// # Errors
    ///
    /// [`RuleError::TurnCount`] for fewer than 2 or more than 16 turns.
    pub fn new(turns: Vec<AntTurn>) -> Result<Self, RuleError> {
        if !(Self::MIN_TURNS..=Self::MAX_TURNS).contains(&turns.len()) {
            return Err(RuleError::TurnCount {
                count: turns.len(),
                min: Self::MIN_TURNS,
                max: Self::MAX_TURNS,
            });
        }
        Ok(Self { turns })
    }

    /// The classic two-colour ant, `"RL"`.
    pub fn classic() -> Self {
        Self {
            turns: vec![AntTurn::Right, AntTurn::Left],
        }
    }

    /// The turns, indexed by ground colour.
    pub fn turns(&self) -> &[AntTurn] {
        &self.turns
    }

    /// Number of ground colours.
    pub fn color_count(&self) -> usize {
        self.turns.len()
    }

    /// Turn made on ground of `color`.
    pub fn turn_for(&self, color: u8) -> AntTurn {
        self.turns[usize::from(color) % self.turns.len()]
    }

    /// Colour that ground of `color` becomes when an ant arrives.
    pub fn next_color(&self, color: u8) -> u8 {
        // At most 16 colours, so this fits.
        ((usize::from(color) + 1) % self.turns.len()) as u8
    }

    /// Check every turn is available on `shape`.
    pub fn validate_for(&self, shape: CellShape) -> Result<(), RuleError> {
        match self.turns.iter().find(|t| !t.is_allowed_on(shape)) {
            Some(turn) => Err(RuleError::TurnNotAllowed {
                turn: turn.abbreviation(),
                shape,
            }),
            None => Ok(()),
        }
    }
}

impl Default for LangtonRules {
    fn default() -> Self {
        Self::classic()
    }
}

impl FromStr for LangtonRules {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule = s.trim().to_ascii_uppercase();
        let mut turns = Vec::new();
        let mut chars = rule.chars().peekable();
        while let Some(c) = chars.next() {
            let turn = match c {
                'L' | 'R' => {
                    let double = chars.next_if(|&d| d == '1' || d == '2') == Some('2');
                    match (c, double) {
                        ('L', false) => AntTurn::Left,
                        ('L', true) => AntTurn::Left2,
                        (_, false) => AntTurn::Right,
                        (_, true) => AntTurn::Right2,
                    }
                }
                'N' | 'C' | 'F' => AntTurn::NoTurn,
                'U' | 'B' => AntTurn::UTurn,
                other => {
                    return Err(RuleError::InvalidCharacter {
                        rule: s.trim().to_owned(),
                        character: other,
                    })
                }
            };
            turns.push(turn);
        }
        Self::new(turns)
    }
}

impl fmt::Display for LangtonRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.turns.iter().try_for_each(|t| f.write_str(t.abbreviation()))
    }
}

impl fmt::Debug for LangtonRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LangtonRules({self})")
    }
}

// ── Entities ───────────────────────────────────────────────────────

/// An ant and the edge it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ant {
    /// Direction of the next move.
    pub direction: CompassDirection,
}

/// Ground colour and occupant of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LangtonCell {
    /// `None` until an ant first arrives.
    pub ground: Option<u8>,
    /// The ant standing here, if any.
    pub ant: Option<Ant>,
}

impl LangtonCell {
    /// Whether an ant stands here.
    pub const fn has_ant(&self) -> bool {
        self.ant.is_some()
    }

    /// Whether an ant has ever arrived here.
    pub const fn is_visited(&self) -> bool {
        self.ground.is_some()
    }
}

impl GridEntity for LangtonCell {
    fn descriptor_id(&self) -> &'static str {
        match (self.ant, self.ground) {
            (Some(_), _) => "ant",
            (None, Some(_)) => "visited",
            (None, None) => "unvisited",
        }
    }
}

// ── Statistics ─────────────────────────────────────────────────────

/// Counts of a Langton run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LangtonStatistics {
    /// Number of cells in the grid.
    pub total_cells: usize,
    /// Ants still on the grid.
    pub ants: usize,
    /// Cells an ant has arrived on at least once.
    pub visited: usize,
    step_count: u64,
    timing: StepTimingStatistics,
}

impl LangtonStatistics {
    /// Statistics before the first step.
    pub fn new(total_cells: usize, ants: usize) -> Self {
        Self {
            total_cells,
            ants,
            ..Self::default()
        }
    }
}

impl SimulationStatistics for LangtonStatistics {
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

/// One ant's move.
#[derive(Clone, Debug)]
pub struct LangtonLogic {
    rules: LangtonRules,
    shape: CellShape,
}

impl LangtonLogic {
    /// Logic for ants following `rules` on `shape` cells.
    pub fn new(rules: LangtonRules, shape: CellShape) -> Self {
        Self { rules, shape }
    }

    /// The rules in use.
    pub fn rules(&self) -> &LangtonRules {
        &self.rules
    }
}

impl<M> AgentStepLogic<LangtonCell, M, LangtonStatistics> for LangtonLogic
where
    M: WritableGridModel<LangtonCell>,
{
    fn perform_agent_step(
        &mut self,
        agent: &GridCell<LangtonCell>,
        model: &mut M,
        _step_index: u64,
        statistics: &mut LangtonStatistics,
    ) -> Result<(), StepError> {
        let from = agent.coordinate;
        let departure = *model.entity(from);
        let Some(ant) = departure.ant else {
            return Ok(());
        };

        let structure = *model.structure();
        let neighbor = cell_neighbor_with_edge_behavior(from, NeighborhoodMode::EdgesOnly, ant.direction, &structure)
            .filter(|n| n.is_resolvable());
        let Some(neighbor) = neighbor else {
            model.set_entity(from, LangtonCell { ant: None, ..departure });
            statistics.ants = statistics.ants.saturating_sub(1);
            return Ok(());
        };

        let to = neighbor.mapped;
        if to != from && model.entity(to).has_ant() {
            return Ok(());
        }

        model.set_entity(from, LangtonCell { ant: None, ..departure });
        let arrival = *model.entity(to);
        let color = arrival.ground.unwrap_or_else(|| {
            statistics.visited += 1;
            0
        });
        let turn = self.rules.turn_for(color);
        let direction = ant
            .direction
            .rotate_on_ring(turn.ring_steps(self.shape), edge_ring(self.shape))
            .map_err(|e| StepError::logic(format!("ant at {from}: {e}")))?;
        model.set_entity(
            to,
            LangtonCell {
                ground: Some(self.rules.next_color(color)),
                ant: Some(Ant { direction }),
            },
        );
        Ok(())
    }
}

// ── Termination ────────────────────────────────────────────────────

/// A Langton run ends when no ant is left or every cell was visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LangtonTermination;

impl<M: ?Sized> TerminationCondition<M, LangtonStatistics> for LangtonTermination {
    fn is_finished(&self, _model: &M, _step_count: u64, statistics: &LangtonStatistics) -> bool {
        statistics.ants == 0 || statistics.visited == statistics.total_cells
    }
}

// ── Config & assembly ──────────────────────────────────────────────

/// Where an ant starts and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AntPlacement {
    /// Starting cell.
    pub coordinate: Coordinate,
    /// Initial facing; must be one of the cell's edge directions.
    pub direction: CompassDirection,
}

/// Model type of a Langton run.
pub type LangtonModel = GridStore<LangtonCell>;
/// Runner type of a Langton run.
pub type LangtonRunner = AsynchronousStepRunner<LangtonCell, LangtonModel, LangtonStatistics, LangtonLogic>;
/// Executor type of a Langton run.
pub type LangtonExecutor = DefaultSimulationExecutor<LangtonRunner, LangtonTermination>;
/// A fully assembled Langton run.
pub type LangtonSimulation = Simulation<LangtonExecutor>;
/// A Langton run whose slow steps pause it.
pub type TimedLangtonSimulation = Simulation<TimedSimulationExecutor<LangtonRunner, LangtonTermination>>;

/// Everything needed to build a Langton run.
#[derive(Clone, Debug, PartialEq)]
pub struct LangtonConfig {
    /// Grid, seed and timing parameters. Ants always move through edges,
    /// whatever the neighbourhood mode says.
    pub base: SimulationConfig,
    /// Turn per ground colour.
    pub rules: LangtonRules,
    /// Starting ants. Empty means one ant in the middle of the grid.
    pub ants: Vec<AntPlacement>,
}

impl Default for LangtonConfig {
    fn default() -> Self {
        Self {
            base: SimulationConfig {
                edge_behavior: GridEdgeBehavior::BLOCK_XY,
                neighborhood_mode: NeighborhoodMode::EdgesOnly,
                ..SimulationConfig::default()
            },
            rules: LangtonRules::classic(),
            ants: Vec::new(),
        }
    }
}

impl LangtonConfig {
    /// Check the base config, the rules against the cell shape and every
    /// ant placement.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        self.rules.validate_for(self.base.cell_shape)?;
        let structure = self.base.structure()?;
        let placements = self.placements(&structure);
        for (i, placement) in placements.iter().enumerate() {
            if !structure.is_coordinate_valid(placement.coordinate) {
                return Err(ConfigError::invalid(
                    "ants",
                    format!("{} is outside {structure}", placement.coordinate),
                ));
            }
            let edges = cell_neighbor_directions(placement.coordinate, NeighborhoodMode::EdgesOnly, structure.cell_shape());
            if !edges.contains(&placement.direction) {
                return Err(ConfigError::invalid(
                    "ants",
                    format!("{} has no edge facing {}", placement.coordinate, placement.direction),
                ));
            }
            if placements[..i].iter().any(|p| p.coordinate == placement.coordinate) {
                return Err(ConfigError::invalid(
                    "ants",
                    format!("two ants start on {}", placement.coordinate),
                ));
            }
        }
        Ok(())
    }

    /// The configured ants, or the single default ant.
    fn placements(&self, structure: &GridStructure) -> Vec<AntPlacement> {
        if !self.ants.is_empty() {
            return self.ants.clone();
        }
        let size = structure.size();
        let coordinate = Coordinate::new(size.width() / 2, size.height() / 2);
        let edges = cell_neighbor_directions(coordinate, NeighborhoodMode::EdgesOnly, structure.cell_shape());
        let direction = if edges.contains(&CompassDirection::N) {
            CompassDirection::N
        } else {
            CompassDirection::S
        };
        vec![AntPlacement { coordinate, direction }]
    }

    /// Build a run with the configured ants on unvisited ground.
    pub fn build(&self) -> Result<LangtonSimulation, ConfigError> {
        Simulation::new(self.base.clone(), self.executor()?)
    }

    /// Like [`build`](Self::build), pausing after steps slower than the
    /// configured budget.
    pub fn build_timed(&self) -> Result<TimedLangtonSimulation, ConfigError> {
        let timed = TimedSimulationExecutor::from_config(self.executor()?, &self.base)?;
        Simulation::new(self.base.clone(), timed)
    }

    fn executor(&self) -> Result<LangtonExecutor, ConfigError> {
        self.validate()?;
        let structure = self.base.structure()?;
        let mut model = GridStore::new(self.base.storage, structure, LangtonCell::default());
        let placements = self.placements(&structure);
        for p in &placements {
            model.set_entity(
                p.coordinate,
                LangtonCell {
                    ground: None,
                    ant: Some(Ant { direction: p.direction }),
                },
            );
        }
        debug!("langton {} on {structure}: {} ants", self.rules, placements.len());

        let logic = LangtonLogic::new(self.rules.clone(), structure.cell_shape());
        let runner = AsynchronousStepRunner::new(model, LangtonCell::has_ant, AgentOrdering::ByPosition, logic);
        let statistics = LangtonStatistics::new(structure.cell_count(), placements.len());
        Ok(DefaultSimulationExecutor::new(runner, LangtonTermination, statistics))
    }
}
