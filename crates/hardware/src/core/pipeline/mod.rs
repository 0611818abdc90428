//! Instruction tracking between decode and retirement.
//!
//! This module contains the reorder buffer core and the values it exchanges with the
//! rest of the pipeline:
//! 1. **Reorder Buffer:** Slot store, allocator, completion merger and commit gate.
//! 2. **Hazards:** Clobber table publication and operand forwarding.
//! 3. **Latches:** Per-cycle port bundles (dispatch, write-back, commit, operand read).
//! 4. **Signals:** Functional-unit classification published through the clobber table.

/// Clobber table and operand forwarding logic.
pub mod hazards;

/// Per-cycle input and output port bundles.
pub mod latches;

/// Circular reorder buffer and its per-cycle step function.
pub mod rob;

/// Functional-unit tags.
pub mod signals;
