//! Trap payloads and error types.
//!
//! This module defines everything the reorder buffer core can report that is not a
//! plain port value. It provides:
//! 1. **Trap Representation:** Synchronous exceptions carried opaquely in instruction records.
//! 2. **Configuration Errors:** Fatal conditions detected once when a buffer is built.
//! 3. **Protocol Violations:** Per-cycle caller precondition breaches, reported but never fatal.
//! 4. **Scenario Errors:** Failures while loading or replaying a recorded cycle trace.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::pipeline::rob::RobTag;

/// Synchronous RISC-V exceptions an in-flight instruction can carry to commit.
///
/// The reorder buffer never interprets these; they are merged from write-back ports and
/// surfaced unchanged on the commit candidate. Asynchronous interrupts are not attached
/// to instructions and therefore have no variant here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trap {
    /// Instruction address misaligned. Carries the misaligned target address.
    InstructionAddressMisaligned(u64),

    /// Instruction access fault. Carries the faulting fetch address.
    InstructionAccessFault(u64),

    /// Illegal instruction. Carries the instruction encoding.
    IllegalInstruction(u32),

    /// Breakpoint. Carries the program counter.
    Breakpoint(u64),

    /// Load address misaligned. Carries the misaligned address.
    LoadAddressMisaligned(u64),

    /// Load access fault. Carries the faulting address.
    LoadAccessFault(u64),

    /// Store/AMO address misaligned. Carries the misaligned address.
    StoreAddressMisaligned(u64),

    /// Store/AMO access fault. Carries the faulting address.
    StoreAccessFault(u64),

    /// `ECALL` executed in user mode.
    EnvironmentCallFromUMode,

    /// `ECALL` executed in supervisor mode.
    EnvironmentCallFromSMode,

    /// `ECALL` executed in machine mode.
    EnvironmentCallFromMMode,

    /// Instruction page fault. Carries the faulting virtual address.
    InstructionPageFault(u64),

    /// Load page fault. Carries the faulting virtual address.
    LoadPageFault(u64),

    /// Store/AMO page fault. Carries the faulting virtual address.
    StorePageFault(u64),
}

impl Trap {
    /// Returns the `mcause` exception code for this trap.
    pub const fn cause(&self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned(_) => 0,
            Self::InstructionAccessFault(_) => 1,
            Self::IllegalInstruction(_) => 2,
            Self::Breakpoint(_) => 3,
            Self::LoadAddressMisaligned(_) => 4,
            Self::LoadAccessFault(_) => 5,
            Self::StoreAddressMisaligned(_) => 6,
            Self::StoreAccessFault(_) => 7,
            Self::EnvironmentCallFromUMode => 8,
            Self::EnvironmentCallFromSMode => 9,
            Self::EnvironmentCallFromMMode => 11,
            Self::InstructionPageFault(_) => 12,
            Self::LoadPageFault(_) => 13,
            Self::StorePageFault(_) => 15,
        }
    }

    /// Returns the value the commit stage would latch into `mtval`.
    pub const fn tval(&self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned(v)
            | Self::InstructionAccessFault(v)
            | Self::Breakpoint(v)
            | Self::LoadAddressMisaligned(v)
            | Self::LoadAccessFault(v)
            | Self::StoreAddressMisaligned(v)
            | Self::StoreAccessFault(v)
            | Self::InstructionPageFault(v)
            | Self::LoadPageFault(v)
            | Self::StorePageFault(v) => *v,
            Self::IllegalInstruction(inst) => *inst as u64,
            Self::EnvironmentCallFromUMode
            | Self::EnvironmentCallFromSMode
            | Self::EnvironmentCallFromMMode => 0,
        }
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr:#x})")
            }
            Self::InstructionAccessFault(addr) => write!(f, "InstructionAccessFault({addr:#x})"),
            Self::IllegalInstruction(inst) => write!(f, "IllegalInstruction({inst:#x})"),
            Self::Breakpoint(pc) => write!(f, "Breakpoint({pc:#x})"),
            Self::LoadAddressMisaligned(addr) => write!(f, "LoadAddressMisaligned({addr:#x})"),
            Self::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Self::StoreAddressMisaligned(addr) => write!(f, "StoreAddressMisaligned({addr:#x})"),
            Self::StoreAccessFault(addr) => write!(f, "StoreAccessFault({addr:#x})"),
            Self::EnvironmentCallFromUMode => write!(f, "EnvironmentCallFromUMode"),
            Self::EnvironmentCallFromSMode => write!(f, "EnvironmentCallFromSMode"),
            Self::EnvironmentCallFromMMode => write!(f, "EnvironmentCallFromMMode"),
            Self::InstructionPageFault(addr) => write!(f, "InstructionPageFault({addr:#x})"),
            Self::LoadPageFault(addr) => write!(f, "LoadPageFault({addr:#x})"),
            Self::StorePageFault(addr) => write!(f, "StorePageFault({addr:#x})"),
        }
    }
}

impl std::error::Error for Trap {}

/// Fatal configuration problems, detected once when a reorder buffer is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Modulo pointer wraparound requires a power-of-two slot count.
    #[error("reorder buffer size {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// One slot is always held back as slack, so fewer than two slots can never admit anything.
    #[error("reorder buffer size {0} is too small (minimum is 2)")]
    TooSmall(usize),

    /// At least one write-back port is needed for any instruction to complete.
    #[error("reorder buffer needs at least one write-back port")]
    NoWritebackPorts,
}

/// A caller precondition that was not upheld during one cycle.
///
/// Violations never abort a step. Each one is logged, counted in the statistics and
/// returned alongside the cycle's outputs so the offending collaborator can be found.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtocolViolation {
    /// Commit acknowledged while the head entry had not completed. The retirement still happens.
    #[error("commit acknowledged for {tag:?} before it completed")]
    CommitNotReady {
        /// Tag of the head entry that was retired early.
        tag: RobTag,
    },

    /// Commit acknowledged with nothing in flight. The acknowledge is ignored.
    #[error("commit acknowledged while the reorder buffer is empty")]
    CommitOnEmpty,

    /// Two write-back ports named the same tag in one cycle. The later port is rejected.
    #[error("write-back port {port} repeats {tag:?} already reported on port {first_port}")]
    DuplicateCompletion {
        /// The repeated tag.
        tag: RobTag,
        /// Port whose report was kept.
        first_port: usize,
        /// Port whose report was rejected.
        port: usize,
    },

    /// An instruction was admitted while another in-flight entry already targets its destination.
    #[error("x{reg} already has an in-flight writer {first:?}; {second:?} now shares it")]
    SharedDestination {
        /// Destination register written by both entries.
        reg: usize,
        /// The entry that was already in flight.
        first: RobTag,
        /// The entry admitted this cycle.
        second: RobTag,
    },

    /// A write-back port named a tag beyond the buffer. The report is dropped.
    #[error("write-back port {port} names {tag:?}, beyond {capacity} slots")]
    TagOutOfRange {
        /// The offending tag.
        tag: RobTag,
        /// Port index of the report.
        port: usize,
        /// Configured slot count.
        capacity: usize,
    },

    /// More write-back reports were supplied than ports are configured. Extras are ignored.
    #[error("{supplied} write-back reports supplied, only {configured} ports configured")]
    ExcessWritebackPorts {
        /// Number of reports presented this cycle.
        supplied: usize,
        /// Number of ports the buffer was built with.
        configured: usize,
    },

    /// An instruction was admitted with a destination outside the architectural register file.
    #[error("destination register x{reg} does not exist")]
    InvalidRegister {
        /// The out-of-range register index.
        reg: usize,
    },
}

/// Errors raised while loading or replaying a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    /// The scenario is not valid JSON or does not match the expected schema.
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    /// The scenario's configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
