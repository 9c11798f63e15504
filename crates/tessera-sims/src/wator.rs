//! Wa-Tor: fish and sharks on a toroidal ocean.
//!
//! Creatures act one at a time in a freshly shuffled order each step, on
//! the live model. A fish swims to a random free neighbour and may leave
//! a child behind. A shark eats a random neighbouring fish if it can,
//! otherwise swims like a fish; it starves when its energy runs out.
//! Fish eaten earlier in the same step are skipped.

use log::debug;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use tessera_core::{Coordinate, GridEntity, StepError};
use tessera_engine::{
    AgentOrdering, AgentStepLogic, AsynchronousStepRunner, ConfigError, DefaultSimulationExecutor,
    Simulation, SimulationConfig, SimulationStatistics, StepTimingStatistics, TerminationCondition,
    TimedSimulationExecutor,
};
use tessera_grid::init;
use tessera_grid::{GridCell, GridStore, ReadableGridModel, WritableGridModel};
use tessera_space::neighborhood::valid_neighbor_coordinates;
use tessera_space::{GridEdgeBehavior, NeighborhoodMode};

const INIT_STREAM: u64 = 1;
const ORDER_STREAM: u64 = 2;
const LOGIC_STREAM: u64 = 3;

/// Upper bound of every integer parameter.
pub const MAX_PARAMETER: u32 = 1_000;

// ── Entities ───────────────────────────────────────────────────────

/// A fish or a shark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Creature {
    /// Unique within a run.
    pub id: u64,
    /// Index of the step the creature was born in; 0 for the initial
    /// population.
    pub born_at: u64,
    /// Remaining energy. Always 0 for fish.
    pub energy: u32,
    /// Step index of the last reproduction.
    pub last_reproduction: Option<u64>,
}

impl Creature {
    /// A creature born during step `born_at`.
    pub const fn new(id: u64, born_at: u64, energy: u32) -> Self {
        Self {
            id,
            born_at,
            energy,
            last_reproduction: None,
        }
    }

    /// Age during step `step_index`.
    pub const fn age_at(&self, step_index: u64) -> u64 {
        step_index.saturating_sub(self.born_at)
    }

    fn may_reproduce(&self, step_index: u64, min_age: u32, interval: u32) -> bool {
        self.age_at(step_index) >= u64::from(min_age)
            && self
                .last_reproduction
                .is_none_or(|last| step_index - last >= u64::from(interval))
    }
}

/// Content of one ocean cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WatorEntity {
    /// Empty ocean, the default.
    #[default]
    Water,
    /// A fish.
    Fish(Creature),
    /// A shark.
    Shark(Creature),
}

impl WatorEntity {
    /// Whether the cell is empty.
    pub const fn is_water(&self) -> bool {
        matches!(self, Self::Water)
    }

    /// Whether the cell holds a fish.
    pub const fn is_fish(&self) -> bool {
        matches!(self, Self::Fish(_))
    }

    /// Whether the cell holds a shark.
    pub const fn is_shark(&self) -> bool {
        matches!(self, Self::Shark(_))
    }

    /// Whether the cell holds a fish or a shark.
    pub const fn is_creature(&self) -> bool {
        !self.is_water()
    }

    /// The creature in the cell, if any.
    pub const fn creature(&self) -> Option<&Creature> {
        match self {
            Self::Water => None,
            Self::Fish(c) | Self::Shark(c) => Some(c),
        }
    }
}

impl GridEntity for WatorEntity {
    fn descriptor_id(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Fish(_) => "fish",
            Self::Shark(_) => "shark",
        }
    }
}

// ── Statistics ─────────────────────────────────────────────────────

/// Population counts of a Wa-Tor run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatorStatistics {
    /// Number of cells in the grid.
    pub total_cells: usize,
    /// Fish alive now.
    pub fish: usize,
    /// Sharks alive now.
    pub sharks: usize,
    /// Largest fish population after any step, including the initial one.
    pub max_fish: usize,
    /// Largest shark population after any step, including the initial one.
    pub max_sharks: usize,
    step_count: u64,
    timing: StepTimingStatistics,
}

impl WatorStatistics {
    /// Statistics for the initial population.
    pub fn new(total_cells: usize, fish: usize, sharks: usize) -> Self {
        Self {
            total_cells,
            fish,
            sharks,
            max_fish: fish,
            max_sharks: sharks,
            ..Self::default()
        }
    }

    /// Cells holding neither fish nor shark.
    pub fn water(&self) -> usize {
        self.total_cells.saturating_sub(self.fish + self.sharks)
    }
}

impl SimulationStatistics for WatorStatistics {
    fn update(&mut self, step_count: u64, timing: &StepTimingStatistics) {
        self.step_count = step_count;
        self.timing = *timing;
        self.max_fish = self.max_fish.max(self.fish);
        self.max_sharks = self.max_sharks.max(self.sharks);
    }

    fn step_count(&self) -> u64 {
        self.step_count
    }

    fn timing(&self) -> &StepTimingStatistics {
        &self.timing
    }
}

// ── Config ─────────────────────────────────────────────────────────

/// Everything needed to build a Wa-Tor run.
#[derive(Clone, Debug, PartialEq)]
pub struct WatorConfig {
    /// Grid, seed and timing parameters.
    pub base: SimulationConfig,
    /// Fraction of cells holding a fish at the start.
    pub fish_percent: f64,
    /// Fraction of cells holding a shark at the start.
    pub shark_percent: f64,
    /// A fish dies at this age.
    pub fish_max_age: u32,
    /// Youngest age at which a fish reproduces.
    pub fish_min_reproduction_age: u32,
    /// Steps between two reproductions of one fish.
    pub fish_reproduction_interval: u32,
    /// A shark dies at this age.
    pub shark_max_age: u32,
    /// Energy of a newborn shark.
    pub shark_birth_energy: u32,
    /// Energy gained per fish eaten.
    pub shark_energy_gain: u32,
    /// Energy lost every turn.
    pub shark_energy_loss: u32,
    /// Youngest age at which a shark reproduces.
    pub shark_min_reproduction_age: u32,
    /// Energy a shark needs to reproduce.
    pub shark_min_reproduction_energy: u32,
    /// Steps between two reproductions of one shark.
    pub shark_reproduction_interval: u32,
}

impl Default for WatorConfig {
    fn default() -> Self {
        Self {
            base: SimulationConfig {
                edge_behavior: GridEdgeBehavior::WRAP_XY,
                ..SimulationConfig::default()
            },
            fish_percent: 0.20,
            shark_percent: 0.05,
            fish_max_age: 20,
            fish_min_reproduction_age: 5,
            fish_reproduction_interval: 3,
            shark_max_age: 40,
            shark_birth_energy: 8,
            shark_energy_gain: 2,
            shark_energy_loss: 1,
            shark_min_reproduction_age: 15,
            shark_min_reproduction_energy: 5,
            shark_reproduction_interval: 3,
        }
    }
}

impl WatorConfig {
    /// Check the base config, both percentages and every integer
    /// parameter against `1..=MAX_PARAMETER`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        for (name, percent) in [("fish_percent", self.fish_percent), ("shark_percent", self.shark_percent)] {
            if !(0.0..=1.0).contains(&percent) {
                return Err(ConfigError::invalid(name, format!("must be within 0..=1, got {percent}")));
            }
        }
        if self.fish_percent + self.shark_percent > 1.0 {
            return Err(ConfigError::invalid(
                "shark_percent",
                "fish and shark percentages exceed the grid",
            ));
        }
        let parameters = [
            ("fish_max_age", self.fish_max_age),
            ("fish_min_reproduction_age", self.fish_min_reproduction_age),
            ("fish_reproduction_interval", self.fish_reproduction_interval),
            ("shark_max_age", self.shark_max_age),
            ("shark_birth_energy", self.shark_birth_energy),
            ("shark_energy_gain", self.shark_energy_gain),
            ("shark_energy_loss", self.shark_energy_loss),
            ("shark_min_reproduction_age", self.shark_min_reproduction_age),
            ("shark_min_reproduction_energy", self.shark_min_reproduction_energy),
            ("shark_reproduction_interval", self.shark_reproduction_interval),
        ];
        for (name, value) in parameters {
            if !(1..=MAX_PARAMETER).contains(&value) {
                return Err(ConfigError::invalid(
                    name,
                    format!("must be within 1..={MAX_PARAMETER}, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Build a run with randomly placed fish and sharks.
    pub fn build(&self) -> Result<WatorSimulation, ConfigError> {
        Simulation::new(self.base.clone(), self.executor()?)
    }

    /// Like [`build`](Self::build), pausing after steps slower than the
    /// configured budget.
    pub fn build_timed(&self) -> Result<TimedWatorSimulation, ConfigError> {
        let timed = TimedSimulationExecutor::from_config(self.executor()?, &self.base)?;
        Simulation::new(self.base.clone(), timed)
    }

    fn executor(&self) -> Result<WatorExecutor, ConfigError> {
        self.validate()?;
        let structure = self.base.structure()?;
        let mut model = GridStore::new(self.base.storage, structure, WatorEntity::Water);
        let mut rng = self.base.rng_stream(INIT_STREAM);
        let mut next_id = 0u64;
        let mut spawn = |energy| {
            let id = next_id;
            next_id += 1;
            Creature::new(id, 0, energy)
        };
        let fish = init::place_random_percent(&mut model, self.fish_percent, || WatorEntity::Fish(spawn(0)), &mut rng)?;
        let birth_energy = self.shark_birth_energy;
        let sharks = init::place_random_percent(
            &mut model,
            self.shark_percent,
            || WatorEntity::Shark(spawn(birth_energy)),
            &mut rng,
        )?;
        debug!("wa-tor on {structure}: {fish} fish, {sharks} sharks");

        let logic = WatorLogic::new(self, self.base.rng_stream(LOGIC_STREAM), next_id);
        let runner = AsynchronousStepRunner::new(
            model,
            WatorEntity::is_creature,
            AgentOrdering::Shuffled(self.base.rng_stream(ORDER_STREAM)),
            logic,
        );
        let statistics = WatorStatistics::new(structure.cell_count(), fish, sharks);
        Ok(DefaultSimulationExecutor::new(runner, WatorTermination, statistics))
    }
}

// ── Logic ──────────────────────────────────────────────────────────

/// One creature's turn.
#[derive(Clone, Debug)]
pub struct WatorLogic {
    config: WatorConfig,
    mode: NeighborhoodMode,
    rng: ChaCha8Rng,
    next_id: u64,
}

impl WatorLogic {
    /// Logic using the parameters of `config`, drawing moves from `rng`
    /// and numbering newborns from `next_id`.
    pub fn new(config: &WatorConfig, rng: ChaCha8Rng, next_id: u64) -> Self {
        Self {
            config: config.clone(),
            mode: config.base.neighborhood_mode,
            rng,
            next_id,
        }
    }

    fn newborn(&mut self, step_index: u64, energy: u32) -> Creature {
        let id = self.next_id;
        self.next_id += 1;
        Creature::new(id, step_index, energy)
    }

    fn random_neighbor<M>(&mut self, from: Coordinate, model: &M, wanted: fn(&WatorEntity) -> bool) -> Option<Coordinate>
    where
        M: ReadableGridModel<WatorEntity>,
    {
        let mut candidates = valid_neighbor_coordinates(from, self.mode, model.structure());
        candidates.retain(|c| wanted(model.entity(*c)));
        candidates.choose(&mut self.rng).copied()
    }

    fn fish_turn<M>(&mut self, mut fish: Creature, from: Coordinate, model: &mut M, step_index: u64, statistics: &mut WatorStatistics)
    where
        M: WritableGridModel<WatorEntity>,
    {
        let mut at = from;
        if let Some(target) = self.random_neighbor(from, model, WatorEntity::is_water) {
            model.swap_entities(from, target);
            at = target;
            let c = &self.config;
            if fish.may_reproduce(step_index, c.fish_min_reproduction_age, c.fish_reproduction_interval) {
                fish.last_reproduction = Some(step_index);
                let child = self.newborn(step_index, 0);
                model.set_entity(from, WatorEntity::Fish(child));
                statistics.fish += 1;
            }
        }

        if fish.age_at(step_index) >= u64::from(self.config.fish_max_age) {
            model.set_entity_to_default(at);
            statistics.fish = statistics.fish.saturating_sub(1);
        } else {
            model.set_entity(at, WatorEntity::Fish(fish));
        }
    }

    fn shark_turn<M>(&mut self, mut shark: Creature, from: Coordinate, model: &mut M, step_index: u64, statistics: &mut WatorStatistics)
    where
        M: WritableGridModel<WatorEntity>,
    {
        shark.energy = shark.energy.saturating_sub(self.config.shark_energy_loss);

        let mut at = from;
        if let Some(prey) = self.random_neighbor(from, model, WatorEntity::is_fish) {
            // The shark is written over the fish below.
            model.set_entity_to_default(from);
            shark.energy = shark.energy.saturating_add(self.config.shark_energy_gain);
            statistics.fish = statistics.fish.saturating_sub(1);
            at = prey;
        } else if let Some(target) = self.random_neighbor(from, model, WatorEntity::is_water) {
            model.swap_entities(from, target);
            at = target;
        }

        let c = &self.config;
        if at != from
            && shark.energy >= c.shark_min_reproduction_energy
            && shark.may_reproduce(step_index, c.shark_min_reproduction_age, c.shark_reproduction_interval)
        {
            shark.last_reproduction = Some(step_index);
            let child = self.newborn(step_index, self.config.shark_birth_energy);
            model.set_entity(from, WatorEntity::Shark(child));
            statistics.sharks += 1;
        }

        if shark.age_at(step_index) >= u64::from(self.config.shark_max_age) || shark.energy == 0 {
            model.set_entity_to_default(at);
            statistics.sharks = statistics.sharks.saturating_sub(1);
        } else {
            model.set_entity(at, WatorEntity::Shark(shark));
        }
    }
}

impl<M> AgentStepLogic<WatorEntity, M, WatorStatistics> for WatorLogic
where
    M: WritableGridModel<WatorEntity>,
{
    fn perform_agent_step(
        &mut self,
        agent: &GridCell<WatorEntity>,
        model: &mut M,
        step_index: u64,
        statistics: &mut WatorStatistics,
    ) -> Result<(), StepError> {
        let snapshot_id = agent.entity.creature().map(|c| c.id);
        let current_id = model.entity(agent.coordinate).creature().map(|c| c.id);
        if snapshot_id != current_id {
            // Eaten earlier in this step.
            return Ok(());
        }
        match agent.entity {
            WatorEntity::Fish(fish) => self.fish_turn(fish, agent.coordinate, model, step_index, statistics),
            WatorEntity::Shark(shark) => self.shark_turn(shark, agent.coordinate, model, step_index, statistics),
            WatorEntity::Water => {}
        }
        Ok(())
    }
}

// ── Termination ────────────────────────────────────────────────────

/// A Wa-Tor run ends when either species has died out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatorTermination;

impl<M: ?Sized> TerminationCondition<M, WatorStatistics> for WatorTermination {
    fn is_finished(&self, _model: &M, _step_count: u64, statistics: &WatorStatistics) -> bool {
        statistics.fish == 0 || statistics.sharks == 0
    }
}

/// Model type of a Wa-Tor run.
pub type WatorModel = GridStore<WatorEntity>;
/// Runner type of a Wa-Tor run.
pub type WatorRunner = AsynchronousStepRunner<WatorEntity, WatorModel, WatorStatistics, WatorLogic>;
/// Executor type of a Wa-Tor run.
pub type WatorExecutor = DefaultSimulationExecutor<WatorRunner, WatorTermination>;
/// A fully assembled Wa-Tor run.
pub type WatorSimulation = Simulation<WatorExecutor>;
/// A Wa-Tor run whose slow steps pause it.
pub type TimedWatorSimulation = Simulation<TimedSimulationExecutor<WatorRunner, WatorTermination>>;

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_engine::{SimulationManager, StepRunner};
    use tessera_grid::DenseGridModel;
    use tessera_space::{CellShape, GridStructure};
    use tessera_test_utils::seeded_rng;

    type Model = DenseGridModel<WatorEntity>;
    type Runner = AsynchronousStepRunner<WatorEntity, Model, WatorStatistics, WatorLogic>;

    fn ocean(creatures: &[(i32, i32, WatorEntity)]) -> (Model, WatorStatistics) {
        let structure =
            GridStructure::from_parts(CellShape::Square, GridEdgeBehavior::BLOCK_XY, 8, 8).unwrap();
        let mut model = DenseGridModel::new(structure, WatorEntity::Water);
        for &(x, y, entity) in creatures {
            model.set_entity(Coordinate::new(x, y), entity);
        }
        let fish = model.count_entities(&WatorEntity::is_fish);
        let sharks = model.count_entities(&WatorEntity::is_shark);
        (model, WatorStatistics::new(64, fish, sharks))
    }

    fn by_position(config: &WatorConfig, model: Model) -> Runner {
        let logic = WatorLogic::new(config, seeded_rng(1), 100);
        AsynchronousStepRunner::new(model, WatorEntity::is_creature, AgentOrdering::ByPosition, logic)
    }

    fn edges_only() -> WatorConfig {
        let mut config = WatorConfig::default();
        config.base.neighborhood_mode = NeighborhoodMode::EdgesOnly;
        config
    }

    fn fish(id: u64) -> WatorEntity {
        WatorEntity::Fish(Creature::new(id, 0, 0))
    }

    fn shark(id: u64, energy: u32) -> WatorEntity {
        WatorEntity::Shark(Creature::new(id, 0, energy))
    }

    // ── Config ──────────────────────────────────────────────────────

    #[test]
    fn default_config_is_valid() {
        assert_eq!(WatorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let config = WatorConfig {
            shark_max_age: 0,
            ..WatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "shark_max_age", .. })
        ));
        let config = WatorConfig {
            fish_percent: 0.7,
            shark_percent: 0.4,
            ..WatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "shark_percent", .. })
        ));
    }

    #[test]
    fn build_places_initial_population() {
        let sim = WatorConfig::default().build().unwrap();
        let stats = sim.statistics();
        assert_eq!(stats.fish, 205);
        assert_eq!(stats.sharks, 51);
        assert_eq!(stats.water(), 1024 - 256);
        assert_eq!(sim.current_model().count_entities(&WatorEntity::is_fish), 205);

        let mut ids: Vec<u64> = sim
            .current_model()
            .non_default_cells()
            .filter_map(|c| c.entity.creature().map(|c| c.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 256);
    }

    // ── Turns ───────────────────────────────────────────────────────

    #[test]
    fn eaten_fish_is_skipped() {
        // The shark acts first (row-major) and its only neighbouring fish
        // is the one at (1, 0).
        let (model, mut stats) = ocean(&[(0, 0, shark(1, 5)), (1, 0, fish(2))]);
        let mut runner = by_position(&edges_only(), model);
        runner.perform_step(0, &mut stats).unwrap();

        let model = runner.current_model();
        assert!(model.entity(Coordinate::new(0, 0)).is_water());
        match model.entity(Coordinate::new(1, 0)) {
            WatorEntity::Shark(s) => {
                assert_eq!(s.id, 1);
                assert_eq!(s.energy, 5 - 1 + 2);
            }
            other => panic!("expected the shark, got {other:?}"),
        }
        assert_eq!(stats.fish, 0);
        assert_eq!(stats.sharks, 1);
        assert_eq!(model.non_default_count(), 1);
    }

    #[test]
    fn mature_fish_leaves_a_child_behind() {
        let (model, mut stats) = ocean(&[(3, 3, fish(1))]);
        let mut runner = by_position(&edges_only(), model);
        runner.perform_step(5, &mut stats).unwrap();

        let model = runner.current_model();
        assert_eq!(stats.fish, 2);
        match model.entity(Coordinate::new(3, 3)) {
            WatorEntity::Fish(child) => {
                assert_eq!(child.id, 100);
                assert_eq!(child.born_at, 5);
            }
            other => panic!("expected a newborn fish, got {other:?}"),
        }
        let parent = model
            .non_default_cells()
            .find_map(|c| c.entity.creature().filter(|c| c.id == 1).copied())
            .unwrap();
        assert_eq!(parent.last_reproduction, Some(5));
    }

    #[test]
    fn young_fish_only_moves() {
        let (model, mut stats) = ocean(&[(3, 3, fish(1))]);
        let mut runner = by_position(&edges_only(), model);
        runner.perform_step(2, &mut stats).unwrap();
        assert_eq!(stats.fish, 1);
        assert!(runner.current_model().entity(Coordinate::new(3, 3)).is_water());
    }

    #[test]
    fn old_fish_dies_after_reproducing() {
        let (model, mut stats) = ocean(&[(3, 3, fish(1))]);
        let mut runner = by_position(&edges_only(), model);
        runner.perform_step(20, &mut stats).unwrap();
        let model = runner.current_model();
        assert_eq!(stats.fish, 1);
        assert_eq!(model.non_default_count(), 1);
        assert_eq!(model.entity(Coordinate::new(3, 3)).creature().map(|c| c.id), Some(100));
    }

    #[test]
    fn shark_starves() {
        let (model, mut stats) = ocean(&[(3, 3, shark(1, 1)), (7, 7, fish(2))]);
        let mut runner = by_position(&edges_only(), model);
        runner.perform_step(0, &mut stats).unwrap();
        assert_eq!(stats.sharks, 0);
        assert_eq!(runner.current_model().count_entities(&WatorEntity::is_shark), 0);
        assert!(WatorTermination.is_finished(runner.current_model(), 1, &stats));
    }

    #[test]
    fn boxed_in_fish_stays_put() {
        let (mut model, mut stats) = ocean(&[(0, 0, fish(1)), (1, 0, shark(10, 50)), (0, 1, shark(11, 50))]);
        let mut logic = WatorLogic::new(&edges_only(), seeded_rng(3), 100);
        let agent = GridCell::new(Coordinate::new(0, 0), fish(1));
        logic.perform_agent_step(&agent, &mut model, 10, &mut stats).unwrap();
        assert_eq!(model.entity(Coordinate::new(0, 0)), &fish(1));
        assert_eq!(stats.fish, 1);
        assert_eq!(model.non_default_count(), 3);
    }

    // ── Runs ────────────────────────────────────────────────────────

    #[test]
    fn same_seed_same_ocean() {
        let run = |seed| {
            let config = WatorConfig {
                base: SimulationConfig {
                    seed,
                    ..WatorConfig::default().base
                },
                ..WatorConfig::default()
            };
            let mut sim = config.build().unwrap();
            sim.execute_steps(15, &mut |_| {}).unwrap();
            let cells: Vec<(Coordinate, WatorEntity)> = sim.current_model().cells().map(|c| (c.coordinate, *c.entity)).collect();
            (cells, sim.statistics().fish, sim.statistics().sharks)
        };
        assert_eq!(run(11), run(11));
        assert_ne!(run(11).0, run(12).0);
    }

    #[test]
    fn counts_match_model_after_steps() {
        let mut sim = WatorConfig::default().build().unwrap();
        sim.execute_steps(25, &mut |_| {}).unwrap();
        let model = sim.current_model();
        let stats = sim.statistics();
        assert_eq!(model.count_entities(&WatorEntity::is_fish), stats.fish);
        assert_eq!(model.count_entities(&WatorEntity::is_shark), stats.sharks);
        assert!(stats.max_fish >= stats.fish);
        assert!(stats.max_sharks >= stats.sharks);
        if sim.is_finished() {
            assert!(stats.fish == 0 || stats.sharks == 0);
        }
    }
}
