//! Hazard publication and operand forwarding.
//!
//! This module derives, from a reorder buffer snapshot, the two views issue logic needs:
//! 1. **Clobber Table:** Which functional unit (if any) will eventually write each register.
//! 2. **Operand Resolution:** The freshest value of a source register, combining stored
//!    results with same-cycle forwarding from the write-back ports.
//!
//! Both are pure functions of the snapshot and the cycle's write-back reports. Tie-breaks
//! follow slot index order, then port index order; they only become visible when upstream
//! logic lets two in-flight instructions share a destination.

use std::fmt;

use serde::Serialize;

use crate::common::constants::{NUM_REGS, ZERO_REG};
use crate::core::pipeline::latches::{Operand, OperandSource, WritebackPort};
use crate::core::pipeline::rob::{RobState, RobTag};
use crate::core::pipeline::signals::FuTag;

/// Pending writer of every architectural register. `x0` always reads [`FuTag::None`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClobberTable([FuTag; NUM_REGS]);

impl ClobberTable {
    /// Returns the pending writer of `reg`, or [`FuTag::None`] for free or out-of-range registers.
    #[inline]
    pub fn get(&self, reg: usize) -> FuTag {
        self.0.get(reg).copied().unwrap_or_default()
    }

    /// Returns true if an in-flight instruction will write `reg`.
    #[inline]
    pub fn is_clobbered(&self, reg: usize) -> bool {
        self.get(reg).is_some()
    }

    /// All entries in register order.
    #[inline]
    pub const fn as_array(&self) -> &[FuTag; NUM_REGS] {
        &self.0
    }

    /// Registers with a pending writer, ascending.
    pub fn clobbered(&self) -> impl Iterator<Item = (usize, FuTag)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, fu)| fu.is_some())
            .map(|(reg, fu)| (reg, *fu))
    }
}

impl fmt::Display for ClobberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (reg, fu) in self.clobbered() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "x{reg}:{fu}")?;
            first = false;
        }
        if first {
            f.write_str("-")?;
        }
        Ok(())
    }
}

/// Builds the clobber table for `state`.
///
/// Occupied slots are visited in ascending slot index, so a higher slot overwrites a lower
/// one targeting the same register regardless of which was allocated first.
pub fn clobber_table(state: &RobState) -> ClobberTable {
    let mut table = [FuTag::None; NUM_REGS];
    for (_, slot) in state.occupied() {
        if let Some(entry) = table.get_mut(slot.record.rd) {
            *entry = slot.record.fu;
        }
    }
    table[ZERO_REG] = FuTag::None;
    ClobberTable(table)
}

/// Resolves source register `reg` against `state` and this cycle's write-back reports.
///
/// The lowest occupied slot writing `reg` supplies its stored result, valid once it has
/// completed. The lowest-indexed valid port that completes a slot writing `reg` without an
/// exception then overrides it with its fresh result. `x0` is always `(0, false)`.
///
/// A port only forwards when its target slot is occupied at the start of the cycle. This is
/// narrower than matching on the slot's destination alone: a flushed slot keeps a stale
/// `rd`, and a straggling report for it would otherwise forward a cancelled result.
pub fn resolve_operand(state: &RobState, reg: usize, writeback: &[WritebackPort]) -> Operand {
    if reg == ZERO_REG {
        return Operand::default();
    }

    let mut operand = state
        .occupied()
        .find(|(_, slot)| slot.record.rd == reg)
        .map(|(tag, slot)| Operand {
            value: slot.record.result,
            valid: slot.record.completed,
            source: OperandSource::Entry { tag },
        })
        .unwrap_or_default();

    let forward = writeback.iter().enumerate().find(|(_, port)| {
        port.valid
            && port.exception.is_none()
            && state
                .live_slot(port.tag)
                .is_some_and(|slot| slot.record.rd == reg)
    });
    if let Some((port, wb)) = forward {
        operand = Operand {
            value: wb.result,
            valid: true,
            source: OperandSource::Bypass { port },
        };
    }

    operand
}

/// Lists every register written by more than one occupied slot, with the two lowest writers.
///
/// The core relies on upstream issue logic preventing this; it is exposed so callers and
/// tests can check the invariant against a snapshot.
pub fn shared_destinations(state: &RobState) -> Vec<(usize, RobTag, RobTag)> {
    let mut first_writer: [Option<RobTag>; NUM_REGS] = [None; NUM_REGS];
    let mut shared: Vec<(usize, RobTag, RobTag)> = Vec::new();
    for (tag, slot) in state.occupied() {
        let rd = slot.record.rd;
        if rd == ZERO_REG || rd >= NUM_REGS {
            continue;
        }
        match first_writer[rd] {
            None => first_writer[rd] = Some(tag),
            Some(first) => {
                if !shared.iter().any(|(reg, _, _)| *reg == rd) {
                    shared.push((rd, first, tag));
                }
            }
        }
    }
    shared
}
