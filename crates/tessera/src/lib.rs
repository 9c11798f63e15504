//! Tessera: a discrete-grid simulation engine for triangle, square and
//! hexagon tilings.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Tessera sub-crates. For most users, adding `tessera` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//! use tessera::sims::conway::patterns;
//!
//! // A glider on an empty 10x10 torus.
//! let mut config = ConwayConfig::for_shape(CellShape::Square);
//! config.base.grid_width = 10;
//! config.base.grid_height = 10;
//! config.base.edge_behavior = GridEdgeBehavior::WRAP_XY;
//! let mut place_glider = |model: &mut dyn WritableGridModel<ConwayEntity>| {
//!     tessera::grid::init::place_pattern(model, &patterns::glider(), Coordinate::new(1, 1));
//!     Ok::<(), ModelError>(())
//! };
//! let mut sim = config.build_with(&mut place_glider).unwrap();
//!
//! let result = sim.execute_steps(4, &mut |_| {}).unwrap();
//! assert_eq!(result.executed_steps, 4);
//! assert_eq!(sim.statistics().alive, 5);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | Coordinates, offsets, entities, step errors |
//! | [`space`] | `tessera-space` | Shapes, edge behaviour, structure, neighbourhoods |
//! | [`grid`] | `tessera-grid` | Dense and sparse models, initializers, patterns |
//! | [`engine`] | `tessera-engine` | Step runners, executors, the simulation facade |
//! | [`sims`] | `tessera-sims` | Conway's life, Wa-Tor, Langton's ant, Sugarscape |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Coordinates, offsets, entities and step errors (`tessera-core`).
pub use tessera_core as types;

/// Grid geometry (`tessera-space`).
///
/// [`space::GridStructure`] bundles a [`space::CellShape`], per-axis
/// [`space::GridEdgeBehavior`] and a size; the
/// [`space::neighborhood`] functions resolve neighbours against it.
pub use tessera_space as space;

/// Grid models (`tessera-grid`).
///
/// [`grid::DenseGridModel`] stores every cell, [`grid::SparseGridModel`]
/// only the non-default ones. [`grid::GridStore`] picks one at runtime.
pub use tessera_grid as grid;

/// Step runners and executors (`tessera-engine`).
///
/// [`engine::SynchronousStepRunner`] for double-buffered cellular automata,
/// [`engine::AsynchronousStepRunner`] for agents moving one at a time,
/// [`engine::TimedSimulationExecutor`] for paced runs.
pub use tessera_engine as engine;

/// Reference simulations (`tessera-sims`).
pub use tessera_sims as sims;

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tessera_core::{Coordinate, GridEntity, Offset, StepError};

    // Space
    pub use tessera_space::{
        CellShape, CompassDirection, EdgeBehavior, GridEdgeBehavior, GridStructure, NeighborhoodMode,
    };

    // Grid
    pub use tessera_grid::{
        DenseGridModel, GridCell, GridInitializer, GridPattern, GridStore, ModelError, ReadableGridModel,
        SparseGridModel, StorageKind, WritableGridModel,
    };

    // Engine
    pub use tessera_engine::{
        AgentOrdering, AgentStepLogic, AsynchronousStepRunner, ConfigError, DefaultSimulationExecutor,
        Simulation, SimulationConfig, SimulationExecutor, SimulationManager, SimulationStatistics,
        SynchronousStepLogic, SynchronousStepRunner, TerminationCondition, TimedSimulationExecutor,
    };

    // Reference simulations
    pub use tessera_sims::{ConwayConfig, ConwayEntity, LangtonConfig, SugarConfig, WatorConfig};
}
