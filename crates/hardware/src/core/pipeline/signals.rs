//! Functional-unit classification.
//!
//! Every instruction entering the reorder buffer is tagged with the functional unit that
//! will produce its result. The tag is opaque to the buffer except for one purpose: it is
//! what the clobber table publishes for each pending destination register, so issue logic
//! can tell which unit a dependent instruction is waiting on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Functional unit that will write an instruction's destination register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuTag {
    /// No pending writer. Sentinel used for free registers and for `x0`.
    #[default]
    None,

    /// Integer ALU (add, logic, shifts, compares, LUI/AUIPC).
    Alu,

    /// Branch unit (conditional branches, JAL/JALR link values).
    Branch,

    /// Load/store unit, including atomics.
    Lsu,

    /// Integer multiplier.
    Mul,

    /// Integer divider.
    Div,

    /// Floating-point unit.
    Fpu,

    /// CSR access unit.
    Csr,
}

impl FuTag {
    /// All tags, sentinel first.
    pub const ALL: [Self; 8] = [
        Self::None,
        Self::Alu,
        Self::Branch,
        Self::Lsu,
        Self::Mul,
        Self::Div,
        Self::Fpu,
        Self::Csr,
    ];

    /// Returns `true` for every tag except the [`FuTag::None`] sentinel.
    #[inline]
    pub const fn is_some(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for FuTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "-",
            Self::Alu => "alu",
            Self::Branch => "bru",
            Self::Lsu => "lsu",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Fpu => "fpu",
            Self::Csr => "csr",
        };
        f.write_str(name)
    }
}
