//! Run configuration.
//!
//! Parameters are immutable for the lifetime of a run. They can be built in code (usually by
//! overriding fields of [`SimulationParameters::default`]) or loaded from a JSON file, where
//! any omitted key takes its default value:
//!
//! ```json
//! {
//!   "seed": 42,
//!   "infection_chance_percent": 60,
//!   "infection_duration_steps": 20,
//!   "max_time_steps": null,
//!   "person_types": {
//!     "SUSCEPTIBLE": { "max_speed": 10, "initial_count": 599 },
//!     "INFECTED": { "max_speed": 2, "initial_count": 1 },
//!     "RECOVERED": { "max_speed": 5, "initial_count": 0 }
//!   }
//! }
//! ```
//!
//! `null` (or an absent key, with the defaults above) means unbounded for
//! `infection_duration_steps` and `max_time_steps`.
use std::fs;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::error::SirError;
use crate::health::HealthState;

/// Movement and initial population for one [`HealthState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonTypeConfig {
    /// The largest distance, in pixels, an agent may move along each axis in one step.
    pub max_speed: u32,
    pub initial_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PersonTypes {
    pub susceptible: PersonTypeConfig,
    pub infected: PersonTypeConfig,
    pub recovered: PersonTypeConfig,
}

impl PersonTypes {
    #[must_use]
    pub fn get(&self, state: HealthState) -> &PersonTypeConfig {
        match state {
            HealthState::Susceptible => &self.susceptible,
            HealthState::Infected => &self.infected,
            HealthState::Recovered => &self.recovered,
        }
    }
}

impl Default for PersonTypes {
    fn default() -> Self {
        PersonTypes {
            susceptible: PersonTypeConfig {
                max_speed: 10,
                initial_count: 599,
            },
            infected: PersonTypeConfig {
                max_speed: 2,
                initial_count: 1,
            },
            recovered: PersonTypeConfig {
                max_speed: 5,
                initial_count: 0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParameters {
    /// Base seed for every random stream of the run.
    pub seed: u64,
    pub agent_radius: f64,
    pub infection_radius: f64,
    /// Chance, in percent, that one infected neighbor infects a susceptible agent in one step.
    pub infection_chance_percent: u8,
    /// Steps an agent stays infected before recovering. `None` never recovers.
    pub infection_duration_steps: Option<u32>,
    pub world_width: u32,
    pub world_height: u32,
    /// `None` runs until some other condition halts the engine.
    pub max_time_steps: Option<u64>,
    pub stop_when_no_infected: bool,
    pub person_types: PersonTypes,
    /// Restricts proximity checks to nearby grid cells. Outcomes are identical either way.
    pub use_spatial_index: bool,
    /// Pause between steps when a driver runs the model in real time.
    pub step_interval_ms: u64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            seed: 0,
            agent_radius: 2.0,
            infection_radius: 6.0,
            infection_chance_percent: 60,
            infection_duration_steps: None,
            world_width: 300,
            world_height: 300,
            max_time_steps: None,
            stop_when_no_infected: true,
            person_types: PersonTypes::default(),
            use_spatial_index: false,
            step_interval_ms: 150,
        }
    }
}

impl SimulationParameters {
    /// Reads parameters from a JSON file. The result is not validated; that happens when the
    /// parameters are handed to `SimulationEngine::reset`.
    ///
    /// # Errors
    ///
    /// Returns a `SirError` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, SirError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// # Errors
    ///
    /// Returns a `SirError::JsonError` if `json` is not a valid parameters document.
    pub fn from_json_str(json: &str) -> Result<Self, SirError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The number of agents in a run, the sum of every type's `initial_count`.
    #[must_use]
    pub fn population_size(&self) -> usize {
        self.person_types.susceptible.initial_count
            + self.person_types.infected.initial_count
            + self.person_types.recovered.initial_count
    }

    /// The center-to-center distance within which two agents are in contact.
    #[must_use]
    pub fn nearby_distance(&self) -> f64 {
        self.infection_radius + self.agent_radius
    }

    /// Whether some halt condition is bound to be met eventually. Without a step limit, a run
    /// only ends once no agent is infected, which never happens if infected agents never
    /// recover and at least one starts infected.
    #[must_use]
    pub fn can_halt(&self) -> bool {
        self.max_time_steps.is_some()
            || (self.stop_when_no_infected
                && (self.infection_duration_steps.is_some()
                    || self.person_types.infected.initial_count == 0))
    }

    /// # Errors
    ///
    /// Returns `SirError::ConfigurationError` naming the first offending parameter.
    pub fn validate(&self) -> Result<(), SirError> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(SirError::config(format!(
                "world dimensions must be positive, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if !self.agent_radius.is_finite() || self.agent_radius < 0.0 {
            return Err(SirError::config(format!(
                "agent_radius must be a non-negative number, got {}",
                self.agent_radius
            )));
        }
        if !self.infection_radius.is_finite() || self.infection_radius < 0.0 {
            return Err(SirError::config(format!(
                "infection_radius must be a non-negative number, got {}",
                self.infection_radius
            )));
        }
        let diameter = 2.0 * self.agent_radius;
        if diameter > f64::from(self.world_width) || diameter > f64::from(self.world_height) {
            return Err(SirError::config(format!(
                "an agent of radius {} does not fit in a {}x{} world",
                self.agent_radius, self.world_width, self.world_height
            )));
        }
        if self.infection_chance_percent > 100 {
            return Err(SirError::config(format!(
                "infection_chance_percent must be between 0 and 100, got {}",
                self.infection_chance_percent
            )));
        }
        Ok(())
    }
}
