//! Simulation drivers built on the reorder buffer core.
//!
//! 1. **Simulator:** Owns a reorder buffer, counts cycles and optionally traces every step.
//! 2. **Scenario:** Loads recorded per-cycle port values from JSON and replays them.

/// Recorded port traces and their replay.
pub mod scenario;

/// Cycle-stepping wrapper around the reorder buffer.
pub mod simulator;

pub use scenario::Scenario;
pub use simulator::{CycleTrace, Simulator};
