//! Pipeline control for a 5-stage in-order RISC-V core.
//!
//! This crate implements the logic that keeps overlapped execution equivalent
//! to sequential execution:
//! 1. **Hazards:** Load-use and jump-operand stalls, control-hazard flushes.
//! 2. **Forwarding:** Operand bypass from the EX/MEM and MEM/WB registers.
//! 3. **Latches:** Pipeline registers with explicit hold and clear transitions.
//! 4. **PC Arbitration:** Interrupt, stall, branch, and sequential priority.
//! 5. **Driver:** A cycle-level driver over pluggable datapath and trap controller traits.

/// Common types and constants (register indices, errors).
pub mod common;
/// Driver configuration (defaults, JSON loading, validation).
pub mod config;
/// Pipeline control (arch signals, hazards, latches, PC, driver).
pub mod core;
/// Pipeline statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Cycle driver; construct with `Pipeline::new`.
pub use crate::core::Pipeline;
