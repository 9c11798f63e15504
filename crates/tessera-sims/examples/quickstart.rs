//! Run each reference simulation for a while and print its statistics.
//!
//! ```text
//! cargo run -p tessera-sims --example quickstart
//! ```

use std::error::Error;

use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use tessera_engine::{SimulationManager, SimulationStatistics};
use tessera_grid::{ReadableGridModel, StorageKind};
use tessera_sims::{ConwayConfig, LangtonConfig, SugarConfig, WatorConfig};
use tessera_space::CellShape;

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let mut life = ConwayConfig::for_shape(CellShape::Hexagon).build_timed()?;
    let result = life.execute_steps(200, &mut |_| {})?;
    let stats = life.statistics();
    info!(
        "life on {}: {} steps, {} alive (max {}), finished={} paused={}",
        life.structure(),
        result.step_count,
        stats.alive,
        stats.max_alive,
        result.finished,
        result.paused,
    );

    let mut ocean = WatorConfig::default();
    ocean.base.seed = 7;
    ocean.base.storage = StorageKind::Sparse;
    let mut wator = ocean.build_timed()?;
    wator.execute_steps(500, &mut |report| {
        if report.step_count % 100 == 0 {
            info!("wa-tor step {}", report.step_count);
        }
    })?;
    let stats = wator.statistics();
    info!(
        "wa-tor: {} fish (max {}), {} sharks (max {}), {} µs/step",
        stats.fish,
        stats.max_fish,
        stats.sharks,
        stats.max_sharks,
        stats.timing().avg_us,
    );

    let mut ant = LangtonConfig::default().build_timed()?;
    let result = ant.execute_steps(20_000, &mut |_| {})?;
    info!(
        "langton {}: {} steps, {} of {} cells visited, {} ants left",
        ant.executor().inner().runner().logic().rules(),
        result.step_count,
        ant.statistics().visited,
        ant.current_model().structure().cell_count(),
        ant.statistics().ants,
    );

    let mut scape = SugarConfig {
        sugar_peaks: 5,
        ..SugarConfig::default()
    }
    .build_timed()?;
    let result = scape.execute_steps(300, &mut |_| {})?;
    let stats = scape.statistics();
    info!(
        "sugarscape: {} steps, {} agents (max {}), {} sugar on {} cells, {} harvested",
        result.step_count,
        stats.agents,
        stats.max_agents,
        stats.sugar,
        stats.sugar_cells,
        stats.harvested,
    );
    Ok(())
}
