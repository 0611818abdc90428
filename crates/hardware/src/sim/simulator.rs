//! Simulator: owns the reorder buffer and the cycle counter.
//!
//! Callers that model the rest of the pipeline drive it one cycle at a time with
//! [`Simulator::tick`]; recorded traces are replayed with [`Simulator::run`].

use serde::Serialize;

use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::Rob;
use crate::core::pipeline::latches::{RobInputs, RobOutputs};
use crate::stats::RobStats;

/// Outputs of one replayed cycle, with the occupancy they were computed from.
#[derive(Clone, Debug, Serialize)]
pub struct CycleTrace {
    /// Cycle number, starting at 0.
    pub cycle: u64,
    /// Occupied slots at the start of the cycle.
    pub occupancy: usize,
    /// Everything the buffer drove during the cycle.
    pub outputs: RobOutputs,
}

/// Top-level simulator: a reorder buffer plus cycle bookkeeping.
#[derive(Debug)]
pub struct Simulator {
    /// The reorder buffer being stepped.
    pub rob: Rob,
    cycle: u64,
    trace_cycles: bool,
}

impl Simulator {
    /// Creates a simulator from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the reorder buffer geometry is rejected.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rob: Rob::new(&config.rob)?,
            cycle: 0,
            trace_cycles: config.general.trace_cycles,
        })
    }

    /// Number of cycles stepped so far.
    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Counters accumulated by the reorder buffer.
    #[inline]
    pub const fn stats(&self) -> &RobStats {
        &self.rob.stats
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self, inputs: &RobInputs) -> RobOutputs {
        let occupancy = self.rob.len();
        let outputs = self.rob.tick(inputs);
        if self.trace_cycles {
            tracing::info!(
                cycle = self.cycle,
                occupancy,
                admissible = outputs.admissible,
                allocated = ?outputs.allocated,
                head = ?outputs.commit.record.tag,
                head_ready = outputs.commit.completed,
                clobber = %outputs.clobber,
                "cycle"
            );
        }
        self.cycle += 1;
        outputs
    }

    /// Replays `cycles` in order, collecting the outputs of each one.
    pub fn run<'a>(&mut self, cycles: impl IntoIterator<Item = &'a RobInputs>) -> Vec<CycleTrace> {
        cycles
            .into_iter()
            .map(|inputs| {
                let cycle = self.cycle;
                let occupancy = self.rob.len();
                let outputs = self.tick(inputs);
                CycleTrace {
                    cycle,
                    occupancy,
                    outputs,
                }
            })
            .collect()
    }
}
