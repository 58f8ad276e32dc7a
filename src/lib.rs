//! An agent-based SIR model of disease spread on a bounded plane.
//!
//! A fixed population of agents wanders a rectangular world. Each agent is susceptible,
//! infected or recovered. At every time step each infected agent may infect susceptible agents
//! within a contact distance, infected agents recover after a configured number of steps, and
//! every agent takes a random step whose size depends on its health state. The per-state
//! counts over time form the familiar epidemic curve.
//!
//! The central object is the [`SimulationEngine`], which owns one run at a time:
//! * [`SimulationEngine::reset`] validates a set of [`SimulationParameters`] and creates the
//!   population.
//! * [`SimulationEngine::step`] advances the run by one time step and returns a
//!   [`StepSnapshot`] of the result.
//! * The engine halts when no infected agents remain (if so configured) or when the maximum
//!   number of time steps has elapsed.
//!
//! Rendering, charting and pacing are left to the caller, which consumes snapshots directly or
//! registers a [`SnapshotObserver`]. The [`report`] module provides a CSV observer and the
//! [`runner`] module a command line driver.
//!
//! Every random draw comes from streams seeded by `SimulationParameters::seed`, so a run is
//! reproducible from its parameters.
pub mod agent;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod health;
pub mod infection;
pub mod log;
pub mod parameters;
pub mod population;
pub mod random;
pub mod report;
pub mod runner;
pub mod snapshot;
pub mod world;

pub use agent::{Agent, Position};
pub use engine::{
    EngineStatus, HaltReason, SimulationEngine, SimulationState, SnapshotObserver,
};
pub use error::SirError;
pub use health::{HealthState, PersonCounts};
pub use infection::InfectionRule;
pub use parameters::{PersonTypeConfig, PersonTypes, SimulationParameters};
pub use population::Population;
pub use random::{RandomSource, RngId, SeededRandomSource};
pub use snapshot::{AgentView, StepSnapshot};
pub use world::World;

// Re-exports for use by models and tests
pub use rand;
