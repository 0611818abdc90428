//! Port bundles sampled and driven by the reorder buffer each cycle.
//!
//! Every interaction with the core goes through these structures:
//! 1. **Dispatch:** Decode offers one candidate instruction per cycle.
//! 2. **Write-back:** Functional units report completions on W independent ports.
//! 3. **Commit:** The commit stage sees the oldest entry and acknowledges its retirement.
//! 4. **Operand Read:** Issue requests two source registers and receives bypassed values.
//!
//! All input fields default to "inactive", so sparse JSON scenarios only need to spell out
//! the wires that are driven in a given cycle.

use serde::{Deserialize, Serialize};

use crate::common::constants::{RD_MASK, RD_SHIFT};
use crate::common::error::{ProtocolViolation, Trap};
use crate::core::pipeline::hazards::ClobberTable;
use crate::core::pipeline::rob::RobTag;
use crate::core::pipeline::signals::FuTag;

/// One instruction as tracked between decode and retirement.
///
/// Apart from `rd`, `fu`, `completed`, `result`, `exception` and `tag`, the buffer treats
/// the record as an opaque payload and hands it back unchanged at commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionRecord {
    /// Program counter of the instruction.
    pub pc: u64,
    /// Raw 32-bit instruction encoding.
    pub inst: u32,
    /// Destination register index (0-31). `x0` means no architectural result.
    pub rd: usize,
    /// Functional unit that will produce the result.
    pub fu: FuTag,
    /// Whether the result (or exception) has been written back.
    pub completed: bool,
    /// Result value, meaningful once `completed` is set.
    pub result: u64,
    /// Exception to raise at commit, if any.
    pub exception: Option<Trap>,
    /// Transaction id. Overwritten with the slot index on allocation.
    pub tag: RobTag,
}

impl InstructionRecord {
    /// Creates a pending record writing `rd` through functional unit `fu`.
    pub const fn new(rd: usize, fu: FuTag) -> Self {
        Self {
            pc: 0,
            inst: 0,
            rd,
            fu,
            completed: false,
            result: 0,
            exception: None,
            tag: RobTag(0),
        }
    }

    /// Creates a pending record from a raw encoding, extracting `rd` from bits 11:7.
    pub const fn decoded(pc: u64, inst: u32, fu: FuTag) -> Self {
        let mut record = Self::new(((inst >> RD_SHIFT) & RD_MASK) as usize, fu);
        record.pc = pc;
        record.inst = inst;
        record
    }

    /// Creates a record that faulted before reaching a functional unit.
    ///
    /// Decode hands these over already completed, so they can retire (and trap) as soon as
    /// they reach the head.
    pub const fn faulted(pc: u64, inst: u32, trap: Trap) -> Self {
        let mut record = Self::new(0, FuTag::None);
        record.pc = pc;
        record.inst = inst;
        record.completed = true;
        record.exception = Some(trap);
        record
    }
}

/// Decode → reorder buffer handshake.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchPort {
    /// A candidate instruction is being offered.
    pub valid: bool,
    /// Downstream stage accepts the candidate this cycle.
    pub ack: bool,
    /// The candidate itself.
    pub record: InstructionRecord,
}

impl DispatchPort {
    /// A valid, acknowledged offer of `record`.
    pub const fn offer(record: InstructionRecord) -> Self {
        Self {
            valid: true,
            ack: true,
            record,
        }
    }
}

/// One functional-unit completion report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritebackPort {
    /// The report is driven this cycle.
    pub valid: bool,
    /// Transaction id of the completing instruction.
    pub tag: RobTag,
    /// Result value.
    pub result: u64,
    /// Exception raised while executing, if any.
    pub exception: Option<Trap>,
}

impl WritebackPort {
    /// A successful completion of `tag` with `result`.
    pub const fn result(tag: RobTag, result: u64) -> Self {
        Self {
            valid: true,
            tag,
            result,
            exception: None,
        }
    }

    /// A faulting completion of `tag`.
    pub const fn fault(tag: RobTag, trap: Trap) -> Self {
        Self {
            valid: true,
            tag,
            result: 0,
            exception: Some(trap),
        }
    }
}

/// Everything the reorder buffer samples in one cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobInputs {
    /// Clear all state, including stored records.
    pub reset: bool,
    /// Discard every in-flight instruction.
    pub flush: bool,
    /// A branch is still unresolved; hold dispatch.
    pub branch_pending: bool,
    /// Candidate from decode.
    pub dispatch: DispatchPort,
    /// Commit stage retires the head entry.
    pub commit_ack: bool,
    /// First source register requested by operand read.
    pub rs1: usize,
    /// Second source register requested by operand read.
    pub rs2: usize,
    /// Completion reports, one per write-back port in port order.
    pub writeback: Vec<WritebackPort>,
}

/// Where a resolved operand value came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum OperandSource {
    /// No in-flight producer; read the architectural register file.
    #[default]
    RegFile,
    /// Stored result of an in-flight entry.
    Entry {
        /// The producing entry.
        tag: RobTag,
    },
    /// Forwarded from a write-back port in the same cycle.
    Bypass {
        /// Index of the forwarding port.
        port: usize,
    },
}

/// A source operand as seen by the operand-read stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Operand {
    /// Value to use when `valid` is set.
    pub value: u64,
    /// The value is final and may be consumed this cycle.
    pub valid: bool,
    /// Producer of the value.
    pub source: OperandSource,
}

/// The oldest in-flight instruction, presented to the commit stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommitCandidate {
    /// Whether the head slot currently holds an instruction.
    pub occupied: bool,
    /// Whether the head instruction has completed and may be acknowledged.
    pub completed: bool,
    /// The head record.
    pub record: InstructionRecord,
}

/// Everything the reorder buffer drives in one cycle.
///
/// All fields reflect the state at the start of the cycle (plus same-cycle forwarding for
/// the operands); none of them observe the cycle's own allocation, completion or commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RobOutputs {
    /// The candidate may be passed on: valid, no branch pending, and room for it.
    pub admissible: bool,
    /// Tag assigned to the candidate if it was accepted this cycle.
    pub allocated: Option<RobTag>,
    /// Pending writer of every architectural register.
    pub clobber: ClobberTable,
    /// Retirement candidate.
    pub commit: CommitCandidate,
    /// Resolved first source operand.
    pub rs1: Operand,
    /// Resolved second source operand.
    pub rs2: Operand,
    /// Caller precondition breaches detected this cycle.
    pub violations: Vec<ProtocolViolation>,
}
