//! Interrupt Request Signals.
//!
//! This module defines the request presented by the interrupt-source
//! collaborator each cycle. It provides:
//! 1. **Request Record:** Pending flag, cause code, and handler vector.
//! 2. **Cause Codes:** Standard machine-level interrupt causes in `mcause` encoding.

use serde::Serialize;

/// Interrupt bit of the `mcause` register (bit 63 on RV64).
pub const CAUSE_INTERRUPT_BIT: u64 = 1 << 63;

/// `mcause` value for a machine software interrupt.
pub const CAUSE_MACHINE_SOFTWARE: u64 = CAUSE_INTERRUPT_BIT | 3;

/// `mcause` value for a machine timer interrupt.
pub const CAUSE_MACHINE_TIMER: u64 = CAUSE_INTERRUPT_BIT | 7;

/// `mcause` value for a machine external interrupt.
pub const CAUSE_MACHINE_EXTERNAL: u64 = CAUSE_INTERRUPT_BIT | 11;

/// Interrupt request sampled once per cycle.
///
/// Whether a pending request is accepted is decided by the CSR holder's enable
/// state, not by the request itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InterruptRequest {
    /// An interrupt source is asserting its line.
    pub pending: bool,
    /// Cause code in `mcause` encoding.
    pub cause: u64,
    /// Trap handler address the PC is redirected to on acceptance.
    pub vector: u64,
}

impl InterruptRequest {
    /// A request with no line asserted.
    pub const NONE: Self = Self {
        pending: false,
        cause: 0,
        vector: 0,
    };

    /// Creates a pending request.
    ///
    /// # Arguments
    ///
    /// * `cause` - Cause code in `mcause` encoding.
    /// * `vector` - Handler address.
    pub const fn raise(cause: u64, vector: u64) -> Self {
        Self {
            pending: true,
            cause,
            vector,
        }
    }
}
