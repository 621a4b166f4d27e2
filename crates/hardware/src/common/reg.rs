//! Architectural Register Index.
//!
//! This module provides `RegIdx`, the 5-bit register identifier carried by the
//! hazard and forwarding logic. It provides:
//! 1. **Domain Enforcement:** Indices are masked to 5 bits on construction.
//! 2. **Zero Register:** `x0` is hardwired to zero and never a dependency.

use std::fmt;

use serde::Serialize;

use super::constants::{NUM_REGS, REG_INDEX_MASK};

/// Index of one of the 32 architectural integer registers.
///
/// Register `x0` is hardwired to the constant zero; the hazard and forwarding
/// units treat it as never produced and never consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegIdx(u8);

impl RegIdx {
    /// The hardwired zero register `x0`.
    pub const ZERO: Self = Self(0);

    /// Creates a register index.
    ///
    /// Out-of-range values are a contract violation by the decoder producing
    /// them; release builds mask to the low 5 bits the way the hardware field
    /// would.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register number (0-31).
    #[inline]
    pub const fn new(idx: u8) -> Self {
        debug_assert!((idx as usize) < NUM_REGS);
        Self(idx & REG_INDEX_MASK)
    }

    /// Returns the register number as an array index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` for the hardwired zero register.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for RegIdx {
    fn from(idx: u8) -> Self {
        Self::new(idx)
    }
}

impl fmt::Display for RegIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
