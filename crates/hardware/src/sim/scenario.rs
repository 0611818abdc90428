//! Recorded port traces.
//!
//! A scenario is a JSON document holding an optional configuration and the inputs of each
//! cycle in order. Every input field defaults to inactive, so a cycle that only dispatches
//! one instruction is written as:
//!
//! ```json
//! { "dispatch": { "valid": true, "ack": true, "record": { "rd": 5, "fu": "alu" } } }
//! ```
//!
//! Replaying a scenario yields one [`CycleTrace`] per cycle and the final statistics.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::ScenarioError;
use crate::config::Config;
use crate::core::pipeline::latches::RobInputs;
use crate::sim::simulator::{CycleTrace, Simulator};
use crate::stats::RobStats;

/// Configuration plus the inputs of every cycle, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Scenario {
    /// Core configuration; defaults apply when omitted.
    #[serde(default)]
    pub config: Config,
    /// Inputs sampled on each cycle.
    #[serde(default)]
    pub cycles: Vec<RobInputs>,
}

impl Scenario {
    /// Parses a scenario from a JSON string.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Json`] if the text does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Io`] if the file cannot be read, [`ScenarioError::Json`] if it
    /// cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let scenario = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), cycles = scenario.cycles.len(), "scenario loaded");
        Ok(scenario)
    }

    /// Replaces the embedded configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replays every cycle on a fresh simulator.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Config`] if the embedded configuration is rejected.
    pub fn run(&self) -> Result<(Vec<CycleTrace>, RobStats), ScenarioError> {
        let mut sim = Simulator::new(&self.config)?;
        let trace = sim.run(&self.cycles);
        Ok((trace, sim.stats().clone()))
    }
}
