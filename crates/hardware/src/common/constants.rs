//! Global constants.
//!
//! Architectural sizes shared by the reorder buffer, the hazard publisher and the tests.

/// Number of architectural integer registers tracked by the clobber table.
pub const NUM_REGS: usize = 32;

/// Index of the hardwired zero register.
pub const ZERO_REG: usize = 0;

/// Bit mask for extracting the destination register (rd) field.
pub const RD_MASK: u32 = 0x1F;

/// Bit position shift for the destination register (rd) field.
pub const RD_SHIFT: u32 = 7;
