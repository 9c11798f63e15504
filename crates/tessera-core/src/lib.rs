//! Core types and traits for the Tessera grid simulation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the lattice value types ([`Coordinate`], [`Offset`]), the
//! [`GridEntity`] trait every stored cell value implements, and the
//! [`StepError`] type returned by step logic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coord;
pub mod entity;
pub mod error;
pub mod offset;

pub use coord::Coordinate;
pub use entity::GridEntity;
pub use error::StepError;
pub use offset::Offset;
