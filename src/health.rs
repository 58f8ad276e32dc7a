use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde_derive::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// The disease classification of an agent.
///
/// Transitions only move forward: `Susceptible -> Infected -> Recovered`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthState {
    Susceptible,
    Infected,
    Recovered,
}

impl HealthState {
    /// Whether moving from `self` to `next` respects the forward-only ordering. Staying in the
    /// same state is always allowed.
    #[must_use]
    pub fn can_transition_to(self, next: HealthState) -> bool {
        self <= next
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Susceptible => "SUSCEPTIBLE",
            HealthState::Infected => "INFECTED",
            HealthState::Recovered => "RECOVERED",
        }
    }
}

impl Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The number of agents in each [`HealthState`].
///
/// Every state is always present, with a count of zero if no agent is in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonCounts(BTreeMap<HealthState, usize>);

impl PersonCounts {
    pub fn new() -> Self {
        PersonCounts(HealthState::iter().map(|state| (state, 0)).collect())
    }

    pub fn increment(&mut self, state: HealthState) {
        *self.0.entry(state).or_insert(0) += 1;
    }

    #[must_use]
    pub fn get(&self, state: HealthState) -> usize {
        self.0.get(&state).copied().unwrap_or(0)
    }

    /// The total across all states.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HealthState, usize)> + '_ {
        self.0.iter().map(|(state, count)| (*state, *count))
    }
}

impl Default for PersonCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<HealthState> for PersonCounts {
    fn from_iter<T: IntoIterator<Item = HealthState>>(iter: T) -> Self {
        let mut counts = PersonCounts::new();
        for state in iter {
            counts.increment(state);
        }
        counts
    }
}

impl Display for PersonCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (state, count) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{state}={count}")?;
            first = false;
        }
        Ok(())
    }
}
