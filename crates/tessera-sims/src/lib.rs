//! Reference simulations for Tessera.
//!
//! Four complete simulations that exercise the whole stack, from grid
//! geometry through step runners to the [`Simulation`] facade:
//!
//! - [`conway`]: life-like cellular automata (synchronous).
//! - [`wator`]: the Wa-Tor predator/prey model (asynchronous, shuffled).
//! - [`langton`]: Langton's ant with multi-colour rules (asynchronous,
//!   row-major).
//! - [`sugar`]: Sugarscape foragers on regrowing sugar hills
//!   (asynchronous, shuffled, with a regrowth pass after the agents).
//!
//! Each module provides a config struct embedding a
//! [`SimulationConfig`] whose `build()` returns a ready-to-run
//! [`Simulation`].
//!
//! [`Simulation`]: tessera_engine::Simulation
//! [`SimulationConfig`]: tessera_engine::SimulationConfig

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod conway;
pub mod error;
pub mod langton;
pub mod sugar;
pub mod wator;

pub use conway::{ConwayConfig, ConwayEntity, ConwayRules, ConwayStatistics, ConwayTermination};
pub use error::RuleError;
pub use langton::{AntTurn, LangtonCell, LangtonConfig, LangtonRules, LangtonStatistics};
pub use sugar::{Sugar, SugarAgent, SugarCell, SugarConfig, SugarStatistics};
pub use wator::{Creature, WatorConfig, WatorEntity, WatorStatistics};
