//! Processor core control.
//!
//! This module contains the pipeline controller and the architecture-level
//! signals it exchanges with the CSR holder and interrupt source.

/// Architecture-level signals (interrupt requests and cause codes).
pub mod arch;

/// Instruction pipeline control (hazards, latches, PC arbitration, cycle driver).
pub mod pipeline;

pub use self::pipeline::Pipeline;
