//! Grid topology and neighbour resolution for Tessera simulations.
//!
//! This crate answers two questions for every supported tiling: which
//! cells are geometric neighbours of a coordinate, and what happens to a
//! neighbour that falls outside the grid.
//!
//! # Geometry
//!
//! - [`CellShape`]: triangle, square or hexagon tiling, with the parity
//!   rules that make triangle and hexagon neighbourhoods position-dependent
//! - [`CompassDirection`]: 16-point directions used to label neighbours
//! - [`connection`]: the per-(shape, mode, parity) connection tables
//!
//! # Boundaries
//!
//! - [`EdgeBehavior`]: per-axis policy (block, wrap, absorb, reflect)
//! - [`GridEdgeBehavior`]: the combined two-axis policy
//! - [`GridStructure`]: validated topology + size; resolves any
//!   coordinate to an [`EdgeBehaviorResult`]
//!
//! # Neighbourhoods
//!
//! The [`neighborhood`] module combines the two: it expands a coordinate
//! into its connection templates and maps each candidate through the
//! structure's edge policy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compass;
pub mod connection;
pub mod edge;
pub mod error;
pub mod neighborhood;
pub mod shape;
pub mod size;
pub mod structure;
pub mod topology;

#[cfg(test)]
pub(crate) mod compliance;

pub use compass::CompassDirection;
pub use connection::{CellConnectionType, CellNeighborConnection, ConnectionKey, NeighborhoodMode};
pub use edge::{Axis, EdgeBehavior, EdgeBehaviorAction, EdgeBehaviorResult, GridEdgeBehavior};
pub use error::GridError;
pub use neighborhood::{CellNeighbor, CellNeighborWithEdgeBehavior};
pub use shape::{CellShape, Parity};
pub use size::GridSize;
pub use structure::{Coordinates, GridStructure};
pub use topology::GridTopology;
