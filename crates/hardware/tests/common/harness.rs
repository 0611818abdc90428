//! Cycle-stepping harness around a [`Simulator`].

use rvrob_core::Simulator;
use rvrob_core::config::{Config, RobConfig};
use rvrob_core::core::Rob;
use rvrob_core::core::pipeline::latches::RobOutputs;
use rvrob_core::core::pipeline::rob::RobTag;
use rvrob_core::core::pipeline::signals::FuTag;

use crate::common::builder::Cycle;

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Default geometry: 16 slots, 4 write-back ports.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Custom slot count with 4 write-back ports.
    pub fn with_entries(entries: usize) -> Self {
        Self::with_config(Config {
            rob: RobConfig {
                entries,
                ..RobConfig::default()
            },
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        let sim = Simulator::new(&config).expect("test config must be valid");
        Self { sim }
    }

    pub fn rob(&self) -> &Rob {
        &self.sim.rob
    }

    /// Steps one cycle with the given inputs.
    pub fn step(&mut self, cycle: Cycle) -> RobOutputs {
        self.sim.tick(&cycle.build())
    }

    /// Steps one cycle with every input inactive.
    pub fn idle(&mut self) -> RobOutputs {
        self.step(Cycle::new())
    }

    /// Dispatches one instruction and returns its tag; panics if it was not admitted.
    pub fn dispatch(&mut self, rd: usize, fu: FuTag) -> RobTag {
        let out = self.step(Cycle::new().dispatch_rd(rd, fu));
        out.allocated.expect("dispatch should have been admitted")
    }

    /// Reports a successful completion for `tag`.
    pub fn complete(&mut self, tag: RobTag, result: u64) -> RobOutputs {
        self.step(Cycle::new().complete(tag.0, result))
    }

    /// Acknowledges the head entry.
    pub fn commit(&mut self) -> RobOutputs {
        self.step(Cycle::new().commit())
    }

    /// Number of slots whose occupied flag is set, counted directly.
    pub fn occupied_slots(&self) -> usize {
        self.rob()
            .state()
            .slots()
            .iter()
            .filter(|slot| slot.occupied)
            .count()
    }
}
