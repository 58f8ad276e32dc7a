//! Pairwise transmission and recovery.
//!
//! Decisions read only the current `state` and `position` of agents and write only
//! `next_state`, so every decision in a step sees the population as it was when the step
//! began, regardless of scan order.
use log::trace;

use crate::agent::{Agent, Position};
use crate::health::HealthState;
use crate::parameters::SimulationParameters;
use crate::population::{Population, SpatialGrid};
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfectionRule {
    nearby_distance: f64,
    infection_chance_percent: u8,
    infection_duration_steps: Option<u32>,
}

impl InfectionRule {
    #[must_use]
    pub fn new(
        nearby_distance: f64,
        infection_chance_percent: u8,
        infection_duration_steps: Option<u32>,
    ) -> Self {
        InfectionRule {
            nearby_distance,
            infection_chance_percent,
            infection_duration_steps,
        }
    }

    #[must_use]
    pub fn from_parameters(params: &SimulationParameters) -> Self {
        InfectionRule::new(
            params.nearby_distance(),
            params.infection_chance_percent,
            params.infection_duration_steps,
        )
    }

    /// The contact distance: infection radius plus the (shared) agent radius.
    #[must_use]
    pub fn nearby_distance(&self) -> f64 {
        self.nearby_distance
    }

    /// Whether the centers of `a` and `b` are within the contact distance.
    #[must_use]
    pub fn proximity(&self, a: &Agent, b: &Agent) -> bool {
        self.within_reach(a.position(), b.position())
    }

    fn within_reach(&self, a: Position, b: Position) -> bool {
        a.distance_to(&b) <= self.nearby_distance
    }

    /// Runs the decision for the infected agent at index `infected`: every other susceptible
    /// agent in contact is staged to become infected with the configured chance, scanning in
    /// index order, and then the agent itself is staged to recover if it has been infected
    /// for the full duration.
    ///
    /// When `grid` is given it must have been built from the current positions; it only
    /// narrows which agents are tested and leaves every outcome and random draw unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `infected` is out of range.
    pub fn decide(
        &self,
        infected: usize,
        population: &mut Population,
        grid: Option<&SpatialGrid>,
        rng: &mut impl RandomSource,
    ) {
        let agents = population.agents_mut();
        let source = agents[infected].position();
        debug_assert_eq!(agents[infected].state(), HealthState::Infected);

        match grid {
            Some(grid) => {
                for other in grid.candidates(source) {
                    if other != infected {
                        self.try_infect(infected, source, &mut agents[other], rng);
                    }
                }
            }
            None => {
                for other in agents.iter_mut() {
                    if other.index() != infected {
                        self.try_infect(infected, source, other, rng);
                    }
                }
            }
        }

        let agent = &mut agents[infected];
        if let Some(duration) = self.infection_duration_steps {
            if agent.infected_steps() >= duration {
                trace!(
                    "agent {} recovers after {} steps",
                    agent.index(),
                    agent.infected_steps()
                );
                agent.stage(HealthState::Recovered);
            }
        }
    }

    fn try_infect(
        &self,
        infected: usize,
        source: Position,
        other: &mut Agent,
        rng: &mut impl RandomSource,
    ) {
        if other.state() == HealthState::Susceptible
            && self.within_reach(source, other.position())
            && rng.next_percent_succeeds(self.infection_chance_percent)
        {
            trace!("agent {} infects agent {}", infected, other.index());
            other.stage(HealthState::Infected);
        }
    }
}
