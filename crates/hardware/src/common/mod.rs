//! Common types used throughout the pipeline model.
//!
//! This module provides the fundamental building blocks shared by every
//! component. It includes:
//! 1. **Constants:** Register count, instruction size, and the canonical NOP.
//! 2. **Error Handling:** Configuration error types.
//! 3. **Register Indices:** The 5-bit `RegIdx` with its zero-register rule.

/// Common constants used throughout the pipeline model.
pub mod constants;

/// Error types.
pub mod error;

/// Architectural register index.
pub mod reg;

pub use constants::{INSTRUCTION_NOP, INSTRUCTION_SIZE, NUM_REGS};
pub use error::ConfigError;
pub use reg::RegIdx;
