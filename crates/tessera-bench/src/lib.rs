//! Benchmark profiles for the Tessera grid simulation engine.
//!
//! - [`reference_structure`]: 100x100 torus (10K cells) of any shape
//! - [`conway_profile`]: Conway's life on the reference structure
//! - [`wator_profile`]: Wa-Tor on the reference structure
//! - [`sugar_profile`]: Sugarscape with five peaks on a 100x100 square grid
//! - [`stress_profile`]: Conway's life on a 316x316 torus (~100K cells)

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use tessera_engine::SimulationConfig;
use tessera_grid::StorageKind;
use tessera_sims::{ConwayConfig, SugarConfig, WatorConfig};
use tessera_space::{CellShape, GridEdgeBehavior, GridError, GridStructure};

/// Side length of the reference grid.
pub const REFERENCE_SIDE: i32 = 100;

/// Side length of the stress grid.
pub const STRESS_SIDE: i32 = 316;

/// A wrapping `REFERENCE_SIDE` square grid of `shape` cells.
///
/// # Errors
///
/// Only if the reference side stops being a valid size for `shape`.
pub fn reference_structure(shape: CellShape) -> Result<GridStructure, GridError> {
    GridStructure::from_parts(shape, GridEdgeBehavior::WRAP_XY, REFERENCE_SIDE, REFERENCE_SIDE)
}

fn sized(base: SimulationConfig, side: i32, storage: StorageKind, seed: u64) -> SimulationConfig {
    SimulationConfig {
        grid_width: side,
        grid_height: side,
        storage,
        seed,
        ..base
    }
}

/// Conway's life at 15% density on the reference structure.
pub fn conway_profile(shape: CellShape, storage: StorageKind, seed: u64) -> ConwayConfig {
    let config = ConwayConfig::for_shape(shape);
    ConwayConfig {
        base: sized(config.base, REFERENCE_SIDE, storage, seed),
        ..config
    }
}

/// Wa-Tor with default parameters on the reference structure.
pub fn wator_profile(shape: CellShape, storage: StorageKind, seed: u64) -> WatorConfig {
    let config = WatorConfig::default();
    WatorConfig {
        base: SimulationConfig {
            cell_shape: shape,
            ..sized(config.base, REFERENCE_SIDE, storage, seed)
        },
        ..config
    }
}

/// Sugarscape with five wide sugar hills on a `REFERENCE_SIDE` square grid.
pub fn sugar_profile(storage: StorageKind, seed: u64) -> SugarConfig {
    let config = SugarConfig::default();
    SugarConfig {
        base: sized(config.base, REFERENCE_SIDE, storage, seed),
        sugar_peaks: 5,
        sugar_radius_limit: 25,
        agent_vision: 4,
        ..config
    }
}

/// Same as [`conway_profile`] at ten times the cell count, dense storage.
pub fn stress_profile(seed: u64) -> ConwayConfig {
    let config = ConwayConfig::for_shape(CellShape::Square);
    ConwayConfig {
        base: sized(config.base, STRESS_SIDE, StorageKind::Dense, seed),
        ..config
    }
}
