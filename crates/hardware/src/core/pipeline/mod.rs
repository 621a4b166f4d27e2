//! Instruction pipeline control.
//!
//! This module contains the control logic of the five-stage in-order pipeline.
//! It includes the following components:
//! 1. **Hazards:** Detection of data and control hazards, and operand forwarding.
//! 2. **Latches:** Inter-stage registers and their capture/hold/clear transitions.
//! 3. **PC:** Next-PC selection by priority.
//! 4. **Engine:** The cycle driver that wires the units together.
//! 5. **Signals:** Control signals and hazard-unit inputs and outputs.
//! 6. **Traits:** Interfaces to the datapath and trap controller.

/// Cycle driver.
pub mod engine;

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Inter-stage pipeline latches (IF/ID, ID/EX, EX/MEM, MEM/WB).
pub mod latches;

/// Next-PC priority arbiter.
pub mod pc;

/// Control signals generated during instruction decoding and hazard detection.
pub mod signals;

/// Traits for pipeline latches and external collaborators.
pub mod traits;

pub use self::engine::{CycleReport, Pipeline};
