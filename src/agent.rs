use serde_derive::{Deserialize, Serialize};

use crate::health::HealthState;

/// A point on the plane, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One simulated individual.
///
/// `next_state` stages the transition decided during a step's decision phase; it is committed
/// to `state` in the apply phase and otherwise equals `state`.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub(crate) index: usize,
    pub(crate) position: Position,
    pub(crate) state: HealthState,
    pub(crate) next_state: HealthState,
    pub(crate) infected_steps: u32,
}

impl Agent {
    #[must_use]
    pub fn new(index: usize, position: Position, state: HealthState) -> Self {
        Agent {
            index,
            position,
            state,
            next_state: state,
            infected_steps: 0,
        }
    }

    /// Stable identifier, the agent's position in its population.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn state(&self) -> HealthState {
        self.state
    }

    #[must_use]
    pub fn next_state(&self) -> HealthState {
        self.next_state
    }

    /// Steps spent infected. Frozen once the agent recovers.
    #[must_use]
    pub fn infected_steps(&self) -> u32 {
        self.infected_steps
    }

    pub(crate) fn stage(&mut self, next: HealthState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "agent {} cannot go from {} to {}",
            self.index,
            self.state,
            next
        );
        self.next_state = next;
    }

    /// Commits the staged transition.
    pub(crate) fn commit(&mut self) {
        assert!(
            self.state.can_transition_to(self.next_state),
            "agent {} regressed from {} to {}",
            self.index,
            self.state,
            self.next_state
        );
        self.state = self.next_state;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_relative_eq!(a.distance_to(&b), 5.0);
        assert_relative_eq!(b.distance_to(&a), 5.0);
        assert_relative_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn new_agent_stages_nothing() {
        let agent = Agent::new(3, Position::new(1.0, 2.0), HealthState::Infected);
        assert_eq!(agent.index(), 3);
        assert_eq!(agent.next_state(), HealthState::Infected);
        assert_eq!(agent.infected_steps(), 0);
    }

    #[test]
    fn commit_applies_staged_state() {
        let mut agent = Agent::new(0, Position::default(), HealthState::Susceptible);
        agent.stage(HealthState::Infected);
        assert_eq!(agent.state(), HealthState::Susceptible);
        agent.commit();
        assert_eq!(agent.state(), HealthState::Infected);
    }

    #[test]
    #[should_panic(expected = "regressed")]
    fn commit_rejects_regression() {
        let mut agent = Agent::new(0, Position::default(), HealthState::Recovered);
        agent.next_state = HealthState::Susceptible;
        agent.commit();
    }
}
