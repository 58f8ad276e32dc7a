use serde_derive::{Deserialize, Serialize};

use crate::agent::{Agent, Position};
use crate::health::{HealthState, PersonCounts};
use crate::population::Population;

/// What a renderer needs to know about one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub index: usize,
    pub position: Position,
    pub state: HealthState,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        AgentView {
            index: agent.index(),
            position: agent.position(),
            state: agent.state(),
        }
    }
}

/// An immutable report of the engine at the end of a time step (or at reset, for step 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub time_step: u64,
    pub counts: PersonCounts,
    pub agents: Vec<AgentView>,
    pub halted: bool,
}

impl StepSnapshot {
    pub(crate) fn capture(
        time_step: u64,
        counts: PersonCounts,
        population: &Population,
        halted: bool,
    ) -> Self {
        StepSnapshot {
            time_step,
            counts,
            agents: population.iter().map(AgentView::from).collect(),
            halted,
        }
    }

    #[must_use]
    pub fn count(&self, state: HealthState) -> usize {
        self.counts.get(state)
    }
}
