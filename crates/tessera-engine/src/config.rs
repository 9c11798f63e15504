//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the shared input for every simulation: grid
//! geometry, storage choice, seed, and the timing budget consumed by
//! [`TimedSimulationExecutor`](crate::TimedSimulationExecutor).

use std::error::Error;
use std::fmt;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_grid::{ModelError, StorageKind};
use tessera_space::{CellShape, GridEdgeBehavior, GridError, GridStructure, NeighborhoodMode};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building or validating a simulation.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The grid geometry is invalid.
    Grid(GridError),
    /// Initial population of the model failed.
    Model(ModelError),
    /// A numeric or rule parameter is out of range.
    InvalidParameter {
        /// Name of the offending field.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Model(e) => write!(f, "initialization: {e}"),
            Self::InvalidParameter { name, reason } => write!(f, "invalid {name}: {reason}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ModelError> for ConfigError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Shared simulation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Cell shape of the grid.
    pub cell_shape: CellShape,
    /// Per-axis boundary policy.
    pub edge_behavior: GridEdgeBehavior,
    /// Grid width in cells.
    pub grid_width: i32,
    /// Grid height in cells.
    pub grid_height: i32,
    /// Rendering hint only. Must be finite and positive.
    pub cell_edge_length: f64,
    /// Seed for every random decision of the run.
    pub seed: u64,
    /// Neighbourhood used by the simulation logic.
    pub neighborhood_mode: NeighborhoodMode,
    /// Dense or sparse model storage.
    pub storage: StorageKind,
    /// A step slower than `timeout_factor * expected_step_interval`
    /// pauses a timed executor. Must be finite and at least 1.
    pub timeout_factor: f64,
    /// Expected wall-clock time of one step. Must be non-zero.
    pub expected_step_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_shape: CellShape::Square,
            edge_behavior: GridEdgeBehavior::BLOCK_XY,
            grid_width: 32,
            grid_height: 32,
            cell_edge_length: 10.0,
            seed: 0,
            neighborhood_mode: NeighborhoodMode::EdgesAndVertices,
            storage: StorageKind::Dense,
            timeout_factor: 2.0,
            expected_step_interval: Duration::from_millis(100),
        }
    }
}

impl SimulationConfig {
    /// Check every field, including the grid geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.structure()?;
        if !self.cell_edge_length.is_finite() || self.cell_edge_length <= 0.0 {
            return Err(ConfigError::invalid(
                "cell_edge_length",
                format!("must be finite and positive, got {}", self.cell_edge_length),
            ));
        }
        if !self.timeout_factor.is_finite() || self.timeout_factor < 1.0 {
            return Err(ConfigError::invalid(
                "timeout_factor",
                format!("must be finite and at least 1, got {}", self.timeout_factor),
            ));
        }
        if self.expected_step_interval.is_zero() {
            return Err(ConfigError::invalid("expected_step_interval", "must be non-zero"));
        }
        Ok(())
    }

    /// Build the grid structure described by this config.
    pub fn structure(&self) -> Result<GridStructure, ConfigError> {
        Ok(GridStructure::from_parts(
            self.cell_shape,
            self.edge_behavior,
            self.grid_width,
            self.grid_height,
        )?)
    }

    /// The run's primary generator.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    /// An independent generator for a separate consumer (initialization,
    /// agent ordering, rule decisions). Stream 0 equals [`rng`](Self::rng).
    pub fn rng_stream(&self, stream: u64) -> ChaCha8Rng {
        let mut rng = self.rng();
        rng.set_stream(stream);
        rng
    }

    /// The duration above which a timed executor pauses.
    pub fn timeout_limit(&self) -> Duration {
        self.expected_step_interval.mul_f64(self.timeout_factor)
    }
}
