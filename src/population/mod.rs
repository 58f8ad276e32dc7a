//! The fixed, ordered set of agents in a run.
mod spatial;

pub use spatial::SpatialGrid;

use log::trace;

use crate::agent::{Agent, Position};
use crate::health::{HealthState, PersonCounts};
use crate::parameters::SimulationParameters;
use crate::random::RandomSource;
use crate::world::World;

/// Exactly `N` agents, where agent `i` sits at index `i` for the whole run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Creates `params.population_size()` agents. Indices below the susceptible count are
    /// susceptible, the next block is infected and the remainder recovered. Each agent is
    /// placed at a uniformly random integer point and then moved once with its type's speed,
    /// which also clamps it into bounds.
    pub fn create(params: &SimulationParameters, world: &World, rng: &mut impl RandomSource) -> Self {
        let types = &params.person_types;
        let n_susceptible = types.susceptible.initial_count;
        let n_infected = types.infected.initial_count;
        let size = params.population_size();

        let mut agents = Vec::with_capacity(size);
        for index in 0..size {
            let state = if index < n_susceptible {
                HealthState::Susceptible
            } else if index < n_susceptible + n_infected {
                HealthState::Infected
            } else {
                HealthState::Recovered
            };
            #[allow(clippy::cast_precision_loss)]
            let position = Position::new(
                rng.next_int_less_than(u64::from(params.world_width)) as f64,
                rng.next_int_less_than(u64::from(params.world_height)) as f64,
            );
            let mut agent = Agent::new(index, position, state);
            world.move_agent(&mut agent, types.get(state).max_speed, rng);
            agents.push(agent);
        }
        trace!("created population of {} agents", agents.len());
        Population { agents }
    }

    /// Builds a population from explicit agents.
    ///
    /// # Panics
    ///
    /// Panics unless agent `i` has index `i` for every `i`.
    #[must_use]
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        for (i, agent) in agents.iter().enumerate() {
            assert_eq!(agent.index, i, "agent at position {i} has index {}", agent.index);
        }
        Population { agents }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Per-state counts over the whole population.
    #[must_use]
    pub fn counts(&self) -> PersonCounts {
        self.agents.iter().map(Agent::state).collect()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{PersonTypeConfig, PersonTypes};
    use crate::random::SeededRandomSource;

    fn params() -> SimulationParameters {
        SimulationParameters {
            person_types: PersonTypes {
                susceptible: PersonTypeConfig {
                    max_speed: 4,
                    initial_count: 5,
                },
                infected: PersonTypeConfig {
                    max_speed: 1,
                    initial_count: 2,
                },
                recovered: PersonTypeConfig {
                    max_speed: 0,
                    initial_count: 3,
                },
            },
            world_width: 40,
            world_height: 30,
            ..SimulationParameters::default()
        }
    }

    #[test]
    fn assigns_states_by_index_block() {
        let params = params();
        let world = World::from_parameters(&params);
        let mut rng = SeededRandomSource::seed_from(1, "population");
        let population = Population::create(&params, &world, &mut rng);

        assert_eq!(population.len(), 10);
        let states: Vec<_> = population.iter().map(Agent::state).collect();
        use HealthState::*;
        assert_eq!(
            states,
            vec![
                Susceptible,
                Susceptible,
                Susceptible,
                Susceptible,
                Susceptible,
                Infected,
                Infected,
                Recovered,
                Recovered,
                Recovered
            ]
        );
        for (i, agent) in population.iter().enumerate() {
            assert_eq!(agent.index(), i);
            assert_eq!(agent.next_state(), agent.state());
            assert_eq!(agent.infected_steps(), 0);
        }
    }

    #[test]
    fn starts_in_bounds() {
        let params = SimulationParameters {
            agent_radius: 5.0,
            ..params()
        };
        let world = World::from_parameters(&params);
        for seed in 0..20 {
            let mut rng = SeededRandomSource::seed_from(seed, "population");
            let population = Population::create(&params, &world, &mut rng);
            for agent in &population {
                assert!(world.contains(agent.position()), "{:?}", agent.position());
            }
        }
    }

    #[test]
    fn counts_every_state() {
        let params = params();
        let world = World::from_parameters(&params);
        let mut rng = SeededRandomSource::seed_from(1, "population");
        let counts = Population::create(&params, &world, &mut rng).counts();
        assert_eq!(counts.get(HealthState::Susceptible), 5);
        assert_eq!(counts.get(HealthState::Infected), 2);
        assert_eq!(counts.get(HealthState::Recovered), 3);
    }

    #[test]
    fn empty_population() {
        let params = SimulationParameters {
            person_types: PersonTypes {
                susceptible: PersonTypeConfig {
                    max_speed: 1,
                    initial_count: 0,
                },
                infected: PersonTypeConfig {
                    max_speed: 1,
                    initial_count: 0,
                },
                recovered: PersonTypeConfig {
                    max_speed: 1,
                    initial_count: 0,
                },
            },
            ..SimulationParameters::default()
        };
        let world = World::from_parameters(&params);
        let mut rng = SeededRandomSource::seed_from(1, "population");
        let population = Population::create(&params, &world, &mut rng);
        assert!(population.is_empty());
        assert_eq!(population.counts().total(), 0);
    }

    #[test]
    #[should_panic(expected = "has index")]
    fn from_agents_checks_indices() {
        let _ = Population::from_agents(vec![Agent::new(
            1,
            Position::default(),
            HealthState::Susceptible,
        )]);
    }
}
