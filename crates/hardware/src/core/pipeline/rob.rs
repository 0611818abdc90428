//! Reorder Buffer (ROB) tracking every instruction between decode and retirement.
//!
//! The ROB is a circular buffer of N slots indexed directly by transaction id. Each cycle
//! it performs, from one shared snapshot:
//! 1. **Allocation:** Admits one candidate from decode at the issue pointer.
//! 2. **Completion:** Merges up to W write-back reports into their slots.
//! 3. **In-order Commit:** Presents the oldest slot and retires it on acknowledge.
//! 4. **Hazard Publication:** Derives the clobber table and bypassed source operands.
//! 5. **Flush/Reset:** Cancels all outstanding work, overriding everything else.
//!
//! State changes are computed into a separate next-state buffer and swapped in at the end
//! of [`Rob::tick`], so no output ever observes a partially applied cycle.

use serde::{Deserialize, Serialize};

use crate::common::constants::{NUM_REGS, ZERO_REG};
use crate::common::error::{ConfigError, ProtocolViolation};
use crate::config::RobConfig;
use crate::core::pipeline::hazards;
use crate::core::pipeline::latches::{
    CommitCandidate, DispatchPort, InstructionRecord, OperandSource, RobInputs, RobOutputs,
    WritebackPort,
};
use crate::stats::RobStats;

/// Transaction id of an in-flight instruction: the index of the slot it was allocated into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobTag(pub usize);

/// One entry of the circular buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RobSlot {
    /// Holds a live, uncommitted instruction.
    pub occupied: bool,
    /// The instruction. Only meaningful while `occupied`.
    pub record: InstructionRecord,
}

/// Complete persistent state of the buffer: slots plus ring pointers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RobState {
    slots: Vec<RobSlot>,
    issue_ptr: usize,
    commit_ptr: usize,
    count: usize,
}

impl RobState {
    /// Creates an empty state with `capacity` default slots.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, RobSlot::default);
        Self {
            slots,
            issue_ptr: 0,
            commit_ptr: 0,
            count: 0,
        }
    }

    /// Number of slots (N).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// All slots in index order.
    #[inline]
    pub fn slots(&self) -> &[RobSlot] {
        &self.slots
    }

    /// Slot the next admitted instruction will occupy.
    #[inline]
    pub const fn issue_ptr(&self) -> usize {
        self.issue_ptr
    }

    /// Oldest occupied slot, next to retire.
    #[inline]
    pub const fn commit_ptr(&self) -> usize {
        self.commit_ptr
    }

    /// Number of occupied slots.
    #[inline]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Occupied slots in ascending slot-index order (not allocation age).
    pub fn occupied(&self) -> impl Iterator<Item = (RobTag, &RobSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.occupied)
            .map(|(idx, slot)| (RobTag(idx), slot))
    }

    /// Returns the slot addressed by `tag`, if it exists and is occupied.
    pub fn live_slot(&self, tag: RobTag) -> Option<&RobSlot> {
        self.slots.get(tag.0).filter(|slot| slot.occupied)
    }

    /// Clears occupancy of every slot and rewinds the pointers.
    ///
    /// Record payloads are left in place; only occupancy, completion and exception
    /// validity are guaranteed cleared.
    fn flush(&mut self) {
        for slot in &mut self.slots {
            slot.occupied = false;
            slot.record.completed = false;
            slot.record.exception = None;
        }
        self.issue_ptr = 0;
        self.commit_ptr = 0;
        self.count = 0;
    }

    #[inline]
    fn wrap(&self, idx: usize) -> usize {
        // Capacity is a power of two, checked at construction.
        idx & (self.slots.len() - 1)
    }
}

/// Reorder buffer: a [`RobState`] advanced one cycle at a time by [`Rob::tick`].
#[derive(Debug)]
pub struct Rob {
    state: RobState,
    writeback_ports: usize,
    /// Event counters accumulated across cycles.
    pub stats: RobStats,
}

impl Rob {
    /// Builds an empty reorder buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the slot count is not a power of two (or below 2), or
    /// if no write-back ports are configured.
    pub fn new(config: &RobConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            entries = config.entries,
            writeback_ports = config.writeback_ports,
            "reorder buffer created"
        );
        Ok(Self {
            state: RobState::new(config.entries),
            writeback_ports: config.writeback_ports,
            stats: RobStats::default(),
        })
    }

    /// Returns the current (pre-step) state.
    #[inline]
    pub const fn state(&self) -> &RobState {
        &self.state
    }

    /// Returns the slot count (N).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.state.capacity()
    }

    /// Returns the configured write-back port count (W).
    #[inline]
    pub const fn writeback_ports(&self) -> usize {
        self.writeback_ports
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.state.count
    }

    /// Returns true if nothing is in flight.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.state.count == 0
    }

    /// Returns true if no further instruction can be admitted (N-1 occupied).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.state.count >= self.capacity() - 1
    }

    /// Returns the number of instructions that can still be admitted.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity() - 1 - self.state.count
    }

    /// Returns the slot addressed by `tag`, occupied or not.
    pub fn slot(&self, tag: RobTag) -> Option<&RobSlot> {
        self.state.slots.get(tag.0)
    }

    /// Returns the head record if the buffer is non-empty.
    pub fn peek_head(&self) -> Option<&InstructionRecord> {
        self.state
            .live_slot(RobTag(self.state.commit_ptr))
            .map(|slot| &slot.record)
    }

    /// Calls `f` on every occupied slot in ascending slot-index order.
    pub fn for_each_occupied(&self, mut f: impl FnMut(RobTag, &InstructionRecord)) {
        for (tag, slot) in self.state.occupied() {
            f(tag, &slot.record);
        }
    }

    /// Whether `dispatch` may be passed on this cycle.
    pub fn admissible(&self, dispatch: &DispatchPort, branch_pending: bool) -> bool {
        dispatch.valid && !branch_pending && !self.is_full()
    }

    /// Advances the buffer by one cycle.
    ///
    /// Outputs are computed from the state at the start of the cycle. Updates are then
    /// applied to a copy in this order: allocation, completion, commit, and finally
    /// flush/reset, which overrides the rest. The copy replaces the state on return.
    pub fn tick(&mut self, inputs: &RobInputs) -> RobOutputs {
        let mut violations = Vec::new();
        let (ports, merge) = self.screen_writeback(&inputs.writeback, &mut violations);

        let admissible = self.admissible(&inputs.dispatch, inputs.branch_pending);
        let head = &self.state.slots[self.state.commit_ptr];
        let mut outputs = RobOutputs {
            admissible,
            allocated: None,
            clobber: hazards::clobber_table(&self.state),
            commit: CommitCandidate {
                occupied: head.occupied,
                completed: head.record.completed,
                record: head.record.clone(),
            },
            rs1: hazards::resolve_operand(&self.state, inputs.rs1, ports),
            rs2: hazards::resolve_operand(&self.state, inputs.rs2, ports),
            violations: Vec::new(),
        };

        let mut next = self.state.clone();

        if admissible && inputs.dispatch.ack {
            let retiring = (inputs.commit_ack && self.state.count > 0)
                .then_some(RobTag(self.state.commit_ptr));
            let cancelled = inputs.flush || inputs.reset;
            outputs.allocated = Some(self.allocate(
                &mut next,
                &inputs.dispatch,
                retiring,
                cancelled,
                &mut violations,
            ));
        }

        for (port_idx, port) in ports.iter().enumerate() {
            if merge[port_idx] {
                self.complete(&mut next, port);
            }
        }

        if inputs.commit_ack {
            self.commit(&mut next, &mut violations);
        }

        if inputs.reset {
            tracing::debug!(in_flight = self.state.count, "reorder buffer reset");
            next = RobState::new(self.capacity());
            self.stats.resets += 1;
        } else if inputs.flush {
            tracing::debug!(in_flight = self.state.count, "reorder buffer flushed");
            next.flush();
            self.stats.flushes += 1;
        }

        self.record_cycle(inputs, &outputs, &violations);
        for violation in &violations {
            tracing::warn!(%violation, "reorder buffer protocol violation");
        }
        outputs.violations = violations;
        self.state = next;
        outputs
    }

    /// Clears all state immediately, outside the cycle flow. Counted like an in-cycle reset.
    pub fn reset(&mut self) {
        tracing::debug!(in_flight = self.state.count, "reorder buffer reset");
        self.state = RobState::new(self.capacity());
        self.stats.resets += 1;
    }

    /// Discards every in-flight instruction immediately, outside the cycle flow. Counted
    /// like an in-cycle flush.
    pub fn flush(&mut self) {
        tracing::debug!(in_flight = self.state.count, "reorder buffer flushed");
        self.state.flush();
        self.stats.flushes += 1;
    }

    /// Trims the write-back ports to the configured width and marks which reports merge.
    ///
    /// A report is excluded from merging if it is not valid, names a tag beyond the buffer,
    /// or repeats a tag already reported on an earlier port this cycle.
    fn screen_writeback<'a>(
        &self,
        writeback: &'a [WritebackPort],
        violations: &mut Vec<ProtocolViolation>,
    ) -> (&'a [WritebackPort], Vec<bool>) {
        let ports = if writeback.len() > self.writeback_ports {
            violations.push(ProtocolViolation::ExcessWritebackPorts {
                supplied: writeback.len(),
                configured: self.writeback_ports,
            });
            &writeback[..self.writeback_ports]
        } else {
            writeback
        };

        let mut merge = vec![false; ports.len()];
        for (port_idx, port) in ports.iter().enumerate() {
            if !port.valid {
                continue;
            }
            if port.tag.0 >= self.capacity() {
                violations.push(ProtocolViolation::TagOutOfRange {
                    tag: port.tag,
                    port: port_idx,
                    capacity: self.capacity(),
                });
                continue;
            }
            let earlier = ports[..port_idx]
                .iter()
                .position(|other| other.valid && other.tag == port.tag);
            if let Some(first_port) = earlier {
                violations.push(ProtocolViolation::DuplicateCompletion {
                    tag: port.tag,
                    first_port,
                    port: port_idx,
                });
                continue;
            }
            merge[port_idx] = true;
        }
        (ports, merge)
    }

    /// Admits `dispatch` at the issue pointer.
    ///
    /// The shared-destination check ignores the head when it retires this cycle
    /// (`retiring`), and is skipped when a flush or reset discards everything anyway.
    fn allocate(
        &self,
        next: &mut RobState,
        dispatch: &DispatchPort,
        retiring: Option<RobTag>,
        cancelled: bool,
        violations: &mut Vec<ProtocolViolation>,
    ) -> RobTag {
        let tag = RobTag(self.state.issue_ptr);
        let rd = dispatch.record.rd;

        if rd >= NUM_REGS {
            violations.push(ProtocolViolation::InvalidRegister { reg: rd });
        } else if rd != ZERO_REG && !cancelled {
            let writer = self
                .state
                .occupied()
                .filter(|(writer, _)| Some(*writer) != retiring)
                .find(|(_, slot)| slot.record.rd == rd)
                .map(|(first, _)| first);
            if let Some(first) = writer {
                violations.push(ProtocolViolation::SharedDestination {
                    reg: rd,
                    first,
                    second: tag,
                });
            }
        }

        let mut record = dispatch.record.clone();
        record.tag = tag;
        tracing::trace!(?tag, pc = record.pc, rd, fu = %record.fu, "dispatch");
        next.slots[tag.0] = RobSlot {
            occupied: true,
            record,
        };
        next.issue_ptr = next.wrap(next.issue_ptr + 1);
        next.count += 1;
        tag
    }

    fn complete(&mut self, next: &mut RobState, port: &WritebackPort) {
        // Occupancy is sampled from the pre-step state: reports for flushed or
        // not-yet-allocated slots are dropped.
        if !self.state.slots[port.tag.0].occupied {
            tracing::trace!(tag = ?port.tag, "stale completion dropped");
            self.stats.stale_completions += 1;
            return;
        }
        let record = &mut next.slots[port.tag.0].record;
        record.completed = true;
        record.result = port.result;
        if let Some(trap) = &port.exception {
            record.exception = Some(trap.clone());
        }
        tracing::trace!(tag = ?port.tag, result = port.result, faulted = port.exception.is_some(), "complete");
        self.stats.completions += 1;
    }

    fn commit(&mut self, next: &mut RobState, violations: &mut Vec<ProtocolViolation>) {
        if self.state.count == 0 {
            violations.push(ProtocolViolation::CommitOnEmpty);
            return;
        }
        let idx = self.state.commit_ptr;
        let tag = RobTag(idx);
        if !self.state.slots[idx].record.completed {
            violations.push(ProtocolViolation::CommitNotReady { tag });
        }
        let slot = &mut next.slots[idx];
        slot.occupied = false;
        slot.record.completed = false;
        tracing::trace!(?tag, pc = slot.record.pc, "commit");
        next.commit_ptr = next.wrap(next.commit_ptr + 1);
        next.count -= 1;
        self.stats.committed += 1;
    }

    fn record_cycle(
        &mut self,
        inputs: &RobInputs,
        outputs: &RobOutputs,
        violations: &[ProtocolViolation],
    ) {
        let stats = &mut self.stats;
        stats.cycles += 1;
        stats.occupancy_sum += self.state.count as u64;
        stats.peak_occupancy = stats.peak_occupancy.max(self.state.count);
        if outputs.allocated.is_some() {
            stats.dispatched += 1;
        }
        if inputs.dispatch.valid {
            if inputs.branch_pending {
                stats.stalls_branch += 1;
            } else if !outputs.admissible {
                stats.stalls_full += 1;
            }
        }
        for operand in [&outputs.rs1, &outputs.rs2] {
            if matches!(operand.source, OperandSource::Bypass { .. }) {
                stats.operands_forwarded += 1;
            }
        }
        stats.violations += violations.len() as u64;
    }
}
