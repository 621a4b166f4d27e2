//! Pipeline Latch and Collaborator Interfaces.
//!
//! This module defines the seams between the pipeline controller and the rest
//! of the processor. It provides:
//! 1. **Pipeline Latch Interface:** Flushing and bubble checks for inter-stage registers.
//! 2. **Datapath Interface:** Instruction memory, register file, ALU, branch
//!    comparator, and data memory, driven by the cycle driver.
//! 3. **Trap Controller Interface:** Interrupt request, enable state, and trap entry.

use crate::common::RegIdx;
use crate::core::arch::trap::InterruptRequest;
use crate::core::pipeline::latches::InstSnapshot;

/// Represents a pipeline latch (inter-stage buffer).
///
/// Latches hold the state of instructions as they move between stages. They support
/// flushing and status checks.
pub trait PipelineLatch {
    /// Replaces the contents with the canonical no-op.
    ///
    /// Typically called on a control hazard or interrupt acceptance.
    fn flush(&mut self);

    /// Checks if the latch presents a no-op.
    ///
    /// # Returns
    ///
    /// `true` if no operation is held, `false` otherwise.
    fn is_bubble(&self) -> bool;
}

/// The functional half of the processor.
///
/// The pipeline controller decides *when* each stage runs and *which*
/// operands it sees; the datapath decides *what* an instruction computes.
/// Calls happen in a fixed order per cycle: `resolve_branch`, `execute`,
/// `memory`, `write_back`, then `fetch`. Register-file reads happen before the
/// cycle's write-back commit.
pub trait Datapath {
    /// Fetches and pre-decodes the instruction at `pc`.
    ///
    /// The returned snapshot must have `pc`, `inst`, `class`, `ctrl`, the
    /// register indices, and `imm` filled; operand and result fields are
    /// ignored.
    fn fetch(&mut self, pc: u64) -> InstSnapshot;

    /// Reads a general-purpose register. `x0` reads as zero.
    fn read_register(&self, idx: RegIdx) -> u64;

    /// Resolves a control-flow instruction in Decode.
    ///
    /// # Arguments
    ///
    /// * `inst` - Instruction in Decode.
    /// * `op1` - Value of `rs1` after Decode-stage forwarding.
    /// * `op2` - Value of `rs2` after Decode-stage forwarding.
    ///
    /// # Returns
    ///
    /// `Some(target)` if the branch or jump is taken, `None` otherwise.
    fn resolve_branch(&mut self, inst: &InstSnapshot, op1: u64, op2: u64) -> Option<u64>;

    /// Computes the Execute result: ALU value, effective address, or link address.
    fn execute(&mut self, inst: &InstSnapshot, op1: u64, op2: u64) -> u64;

    /// Performs the memory access of a load or store.
    ///
    /// For stores, `inst.op2` holds the forwarded store data and `inst.result`
    /// the address.
    ///
    /// # Returns
    ///
    /// The loaded value for loads; ignored for stores.
    fn memory(&mut self, inst: &InstSnapshot) -> u64;

    /// Commits `value` to the destination register of `inst`.
    fn write_back(&mut self, inst: &InstSnapshot, value: u64);
}

/// The CSR holder and interrupt source, as seen by the pipeline.
pub trait TrapController {
    /// Samples the interrupt lines for this cycle.
    fn poll(&mut self) -> InterruptRequest;

    /// Returns `true` if the CSR state currently allows interrupts to be taken.
    fn interrupts_enabled(&self) -> bool;

    /// Enters the trap handler for an accepted interrupt.
    ///
    /// # Arguments
    ///
    /// * `request` - The accepted request.
    /// * `epc` - Address of the oldest instruction that did not complete.
    fn enter_trap(&mut self, request: &InterruptRequest, epc: u64);
}

/// A trap controller with no interrupt sources.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInterrupts;

impl TrapController for NoInterrupts {
    fn poll(&mut self) -> InterruptRequest {
        InterruptRequest::NONE
    }

    fn interrupts_enabled(&self) -> bool {
        false
    }

    fn enter_trap(&mut self, _request: &InterruptRequest, _epc: u64) {}
}
