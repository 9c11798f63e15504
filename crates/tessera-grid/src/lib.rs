//! Entity storage for Tessera grid simulations.
//!
//! A grid model maps every valid coordinate of a [`GridStructure`] to
//! exactly one entity, one of which is declared the default. Two storage
//! strategies present the same [`ReadableGridModel`] /
//! [`WritableGridModel`] contract:
//!
//! - [`DenseGridModel`]: one slot per cell, O(1) everywhere.
//! - [`SparseGridModel`]: only non-default cells are stored.
//!
//! [`GridStore`] picks between them at runtime. Patterns and initializers
//! populate models before the first step.
//!
//! [`GridStructure`]: tessera_space::GridStructure

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod dense;
pub mod error;
pub mod init;
pub mod model;
pub mod pattern;
pub mod sparse;
pub mod store;

pub use cell::GridCell;
pub use dense::DenseGridModel;
pub use error::ModelError;
pub use init::GridInitializer;
pub use model::{ReadableGridModel, WritableGridModel};
pub use pattern::GridPattern;
pub use sparse::SparseGridModel;
pub use store::{GridStore, StorageKind};
