//! Common types and constants shared across the reorder buffer core.
//!
//! This module provides the building blocks used by every facet of the core:
//! 1. **Constants:** Architectural register counts and instruction field layout.
//! 2. **Error Handling:** Trap payloads, configuration errors and protocol violations.

/// Architectural constants.
pub mod constants;

/// Error types and trap definitions.
pub mod error;

pub use constants::{NUM_REGS, ZERO_REG};
pub use error::{ConfigError, ProtocolViolation, ScenarioError, Trap};
