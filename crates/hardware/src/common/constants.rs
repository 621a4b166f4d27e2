//! Global Pipeline Constants.
//!
//! This module defines constants shared across the pipeline model. It includes:
//! 1. **Register Constants:** Architectural register count and index field width.
//! 2. **Instruction Constants:** Instruction size and the canonical no-op encoding.

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Bit mask for a 5-bit register index field.
pub const REG_INDEX_MASK: u8 = 0x1F;

/// Size of a standard (32-bit) RISC-V instruction in bytes.
///
/// The sequential PC advance is always by this amount; compressed instructions
/// are not modelled.
pub const INSTRUCTION_SIZE: u64 = 4;

/// ADDI x0, x0, 0 instruction encoding (canonical NOP).
///
/// Flushed and reset pipeline registers carry this encoding.
pub const INSTRUCTION_NOP: u32 = 0x0000_0013;
