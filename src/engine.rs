//! The step-by-step simulation driver.
//!
//! A run starts with [`SimulationEngine::new`] or [`SimulationEngine::reset`] and advances one
//! time step per call to [`SimulationEngine::step`]. Each step has two phases:
//!
//! 1. **Decision.** Every agent that is infected at the start of the step, in index order,
//!    tries to infect its susceptible neighbors and may stage its own recovery. Decisions
//!    read only current states and positions and write only staged (`next_state`) states,
//!    so no decision sees the effect of another decision made in the same step.
//! 2. **Apply.** Every agent, in index order, moves with the speed of its current state and
//!    then commits its staged state.
//!
//! Counts are then recomputed and the termination conditions checked. Once the engine halts
//! it stays halted until the next `reset`; further calls to `step` return the last snapshot.
use std::fmt::{self, Display};

use log::{debug, info};
use serde_derive::Serialize;

use crate::define_rng;
use crate::error::SirError;
use crate::health::{HealthState, PersonCounts};
use crate::infection::InfectionRule;
use crate::parameters::SimulationParameters;
use crate::population::{Population, SpatialGrid};
use crate::random::{RandomSource, SeededRandomSource};
use crate::snapshot::StepSnapshot;
use crate::world::World;

define_rng!(PlacementMovementRng);
define_rng!(InfectionRng);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    Halted,
}

/// Why a run halted. When both conditions hold at once, `NoInfected` is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HaltReason {
    NoInfected,
    MaxTimeSteps,
}

impl Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HaltReason::NoInfected => f.write_str("no infected agents remain"),
            HaltReason::MaxTimeSteps => f.write_str("maximum time steps reached"),
        }
    }
}

/// Receives every snapshot the engine produces. Any `FnMut(&StepSnapshot)` is an observer.
pub trait SnapshotObserver {
    fn on_snapshot(&mut self, snapshot: &StepSnapshot);

    /// Called once by the driver when it stops stepping. Returns the first error the observer
    /// hit while handling snapshots, if any.
    ///
    /// # Errors
    ///
    /// Returns whatever error the observer recorded.
    fn finish(&mut self) -> Result<(), SirError> {
        Ok(())
    }
}

impl<F: FnMut(&StepSnapshot)> SnapshotObserver for F {
    fn on_snapshot(&mut self, snapshot: &StepSnapshot) {
        self(snapshot);
    }
}

/// The mutable state of one run.
#[derive(Debug, Clone)]
pub struct SimulationState {
    time_step: u64,
    population: Population,
    counts: PersonCounts,
    running: bool,
    halted: bool,
    halt_reason: Option<HaltReason>,
}

impl SimulationState {
    /// Completed steps since the last reset.
    #[must_use]
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn counts(&self) -> &PersonCounts {
        &self.counts
    }

    /// Whether the driver should keep calling `step`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    #[must_use]
    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt_reason
    }
}

/// Everything owned by a single run. Replaced wholesale by `reset`.
struct Run<R> {
    params: SimulationParameters,
    world: World,
    rule: InfectionRule,
    movement_rng: R,
    infection_rng: R,
    state: SimulationState,
    last_snapshot: StepSnapshot,
}

impl<R: RandomSource> Run<R> {
    fn start(params: SimulationParameters) -> Result<Self, SirError> {
        params.validate()?;

        let world = World::from_parameters(&params);
        let rule = InfectionRule::from_parameters(&params);
        let mut movement_rng = R::for_stream(params.seed, PlacementMovementRng);
        let infection_rng = R::for_stream(params.seed, InfectionRng);
        let population = Population::create(&params, &world, &mut movement_rng);
        let counts = population.counts();

        info!(
            "reset: {} agents ({}), seed {}",
            population.len(),
            counts,
            params.seed
        );

        let last_snapshot = StepSnapshot::capture(0, counts.clone(), &population, false);
        Ok(Run {
            params,
            world,
            rule,
            movement_rng,
            infection_rng,
            state: SimulationState {
                time_step: 0,
                population,
                counts,
                running: false,
                halted: false,
                halt_reason: None,
            },
            last_snapshot,
        })
    }

    fn advance(&mut self) {
        let Run {
            params,
            world,
            rule,
            movement_rng,
            infection_rng,
            state,
            ..
        } = self;
        let population = &mut state.population;

        // Decision phase. States only change in the apply phase, so scanning `state` here
        // always sees the population as it was at the start of the step.
        let grid = params
            .use_spatial_index
            .then(|| SpatialGrid::build(population.agents(), rule.nearby_distance()));
        for index in 0..population.len() {
            if population.agents()[index].state() != HealthState::Infected {
                continue;
            }
            rule.decide(index, population, grid.as_ref(), infection_rng);
            let agent = &mut population.agents_mut()[index];
            agent.infected_steps = agent.infected_steps.saturating_add(1);
        }

        // Apply phase.
        for agent in population.agents_mut() {
            let max_speed = params.person_types.get(agent.state()).max_speed;
            world.move_agent(agent, max_speed, movement_rng);
            agent.commit();
        }

        state.time_step += 1;
        state.counts = population.counts();
        debug!("step {}: {}", state.time_step, state.counts);

        let no_infected =
            params.stop_when_no_infected && state.counts.get(HealthState::Infected) == 0;
        let out_of_time = params
            .max_time_steps
            .is_some_and(|max| state.time_step >= max);
        let reason = if no_infected {
            Some(HaltReason::NoInfected)
        } else if out_of_time {
            Some(HaltReason::MaxTimeSteps)
        } else {
            None
        };
        if let Some(reason) = reason {
            info!(
                "halted at step {}: {} ({})",
                state.time_step, reason, state.counts
            );
            state.halted = true;
            state.running = false;
            state.halt_reason = Some(reason);
        }

        self.last_snapshot = StepSnapshot::capture(
            self.state.time_step,
            self.state.counts.clone(),
            &self.state.population,
            self.state.halted,
        );
    }
}

/// Owns one run at a time plus the observers that consume its snapshots.
pub struct SimulationEngine<R: RandomSource = SeededRandomSource> {
    run: Run<R>,
    observers: Vec<Box<dyn SnapshotObserver>>,
}

impl SimulationEngine<SeededRandomSource> {
    /// Starts a run with the default random source.
    ///
    /// # Errors
    ///
    /// Returns `SirError::ConfigurationError` if `params` fail validation.
    pub fn new(params: SimulationParameters) -> Result<Self, SirError> {
        Self::with_random_source(params)
    }
}

impl<R: RandomSource> SimulationEngine<R> {
    /// Starts a run drawing from sources of type `R`.
    ///
    /// # Errors
    ///
    /// Returns `SirError::ConfigurationError` if `params` fail validation.
    pub fn with_random_source(params: SimulationParameters) -> Result<Self, SirError> {
        Ok(SimulationEngine {
            run: Run::start(params)?,
            observers: Vec::new(),
        })
    }

    /// Discards the current run and starts a new one. The step-0 snapshot is delivered to
    /// every observer. On error the current run is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `SirError::ConfigurationError` if `params` fail validation.
    pub fn reset(&mut self, params: SimulationParameters) -> Result<&SimulationState, SirError> {
        self.run = Run::start(params)?;
        self.notify();
        Ok(&self.run.state)
    }

    /// Advances one time step and returns the new snapshot. On a halted engine this does
    /// nothing and returns the last snapshot again.
    pub fn step(&mut self) -> &StepSnapshot {
        if self.run.state.halted {
            return &self.run.last_snapshot;
        }
        self.run.advance();
        self.notify();
        &self.run.last_snapshot
    }

    /// Sets whether the driver should keep stepping. Starting a halted engine is ignored.
    pub fn set_running(&mut self, running: bool) {
        if running && self.run.state.halted {
            debug!("ignoring start request: engine is halted");
            return;
        }
        self.run.state.running = running;
    }

    /// Starts the engine and steps until it halts, stops running, or `max_steps` steps have
    /// been taken by this call.
    pub fn run(&mut self, max_steps: Option<u64>) -> &StepSnapshot {
        self.set_running(true);
        let mut taken = 0;
        while self.run.state.running && max_steps.is_none_or(|max| taken < max) {
            self.step();
            taken += 1;
        }
        &self.run.last_snapshot
    }

    /// Registers an observer. It immediately receives the latest snapshot and then every
    /// snapshot produced by `reset` or by a step that advances the run.
    pub fn add_observer(&mut self, mut observer: impl SnapshotObserver + 'static) {
        observer.on_snapshot(&self.run.last_snapshot);
        self.observers.push(Box::new(observer));
    }

    /// Calls [`SnapshotObserver::finish`] on every observer, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first error reported. Every observer is finished regardless.
    pub fn finish_observers(&mut self) -> Result<(), SirError> {
        let mut first_error = None;
        for observer in &mut self.observers {
            if let Err(e) = observer.finish() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer.on_snapshot(&self.run.last_snapshot);
        }
    }

    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.run.state
    }

    #[must_use]
    pub fn parameters(&self) -> &SimulationParameters {
        &self.run.params
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.run.world
    }

    #[must_use]
    pub fn time_step(&self) -> u64 {
        self.run.state.time_step
    }

    #[must_use]
    pub fn counts(&self) -> &PersonCounts {
        &self.run.state.counts
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.run.state.population
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run.state.running
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.run.state.halted
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        if self.run.state.halted {
            EngineStatus::Halted
        } else {
            EngineStatus::Running
        }
    }

    #[must_use]
    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.run.state.halt_reason
    }

    #[must_use]
    pub fn last_snapshot(&self) -> &StepSnapshot {
        &self.run.last_snapshot
    }
}
