//! Step execution for Tessera grid simulations.
//!
//! A simulation advances through a [`StepRunner`]:
//!
//! - [`SynchronousStepRunner`] computes each generation into a second,
//!   preallocated model and swaps (cellular-automaton semantics).
//! - [`AsynchronousStepRunner`] mutates one model in place, visiting agent
//!   cells in a pluggable order (agent-based semantics).
//!
//! Runners are driven by a [`SimulationExecutor`] that times each step,
//! updates [`SimulationStatistics`], evaluates a [`TerminationCondition`]
//! and emits [`SimulationEvent`]s. [`TimedSimulationExecutor`] adds a
//! step-duration watchdog that pauses instead of failing. [`Simulation`]
//! bundles an executor with its [`SimulationConfig`] behind the
//! [`SimulationManager`] facade.
//!
//! Stepping is single-threaded and cooperative. [`TickTimer`] provides
//! the external fixed-interval trigger; steps always run on the thread
//! that owns the executor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod asynchronous;
pub mod cancel;
pub mod config;
pub mod event;
pub mod executor;
pub mod manager;
pub mod metrics;
pub mod runner;
pub mod statistics;
pub mod synchronous;
pub mod termination;
pub mod tick_timer;
pub mod timed;

pub use asynchronous::{AgentOrdering, AgentStepLogic, AsynchronousStepRunner};
pub use cancel::CancellationToken;
pub use config::{ConfigError, SimulationConfig};
pub use event::SimulationEvent;
pub use executor::{DefaultSimulationExecutor, ExecutionResult, SimulationExecutor, StepReport};
pub use manager::{Simulation, SimulationManager};
pub use metrics::StepTimingStatistics;
pub use runner::StepRunner;
pub use statistics::{BasicStatistics, SimulationStatistics};
pub use synchronous::{PerCell, SynchronousStepLogic, SynchronousStepRunner};
pub use termination::{MaxSteps, Never, TerminationCondition};
pub use tick_timer::{Tick, TickTimer};
pub use timed::{TimedSimulationExecutor, TimeoutEvent};
