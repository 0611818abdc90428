//! Reorder buffer core for out-of-order RISC-V pipelines.
//!
//! This crate models, cycle by cycle, the structure that tracks every instruction between
//! decode and retirement:
//! 1. **Core:** Circular slot store, allocator, completion merger and in-order commit gate.
//! 2. **Hazards:** Per-register clobber table and operand forwarding from write-back ports.
//! 3. **Common:** Trap payloads, configuration errors and protocol violations.
//! 4. **Simulation:** Cycle stepping, JSON scenario replay and trace output.
//! 5. **Statistics:** Occupancy, stall and forwarding counters.
//!
//! ```
//! use rvrob_core::config::Config;
//! use rvrob_core::core::pipeline::latches::{DispatchPort, InstructionRecord, RobInputs, WritebackPort};
//! use rvrob_core::core::pipeline::rob::RobTag;
//! use rvrob_core::core::pipeline::signals::FuTag;
//! use rvrob_core::Simulator;
//!
//! let mut sim = Simulator::new(&Config::default()).unwrap();
//! let out = sim.tick(&RobInputs {
//!     dispatch: DispatchPort::offer(InstructionRecord::new(5, FuTag::Alu)),
//!     ..Default::default()
//! });
//! assert_eq!(out.allocated, Some(RobTag(0)));
//!
//! let out = sim.tick(&RobInputs {
//!     rs1: 5,
//!     writeback: vec![WritebackPort::result(RobTag(0), 42)],
//!     ..Default::default()
//! });
//! assert_eq!(out.clobber.get(5), FuTag::Alu);
//! assert_eq!((out.rs1.value, out.rs1.valid), (42, true));
//! ```

/// Common types and constants (register counts, traps, errors).
pub mod common;
/// Core configuration (defaults, reorder buffer geometry, validation).
pub mod config;
/// Reorder buffer, hazard publication and port bundles.
pub mod core;
/// Cycle-stepping simulator and scenario replay.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The reorder buffer itself.
pub use crate::core::Rob;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
