//! Pipeline statistics collection and reporting.
//!
//! This module tracks what the control logic did while a program ran. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (CPI, IPC).
//! 2. **Stalls:** Data-stall cycles split by one-cycle and two-cycle cause.
//! 3. **Flushes:** Control-hazard flushes, inserted bubbles, and interrupts taken.
//! 4. **Forwarding:** Operands bypassed into Execute from each pipeline register.

use std::fmt;

use serde::Serialize;

use crate::core::pipeline::signals::{ForwardSource, ForwardingPlan};

/// Counters accumulated by the cycle driver since the last reset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Total cycles elapsed.
    pub cycles: u64,
    /// Number of instructions that completed write-back.
    pub instructions_retired: u64,

    /// Stall cycles caused by a producer in Execute.
    pub stalls_one_cycle: u64,
    /// Stall cycles caused by a load in Memory feeding a jump/branch.
    pub stalls_two_cycle: u64,
    /// Wrong-path fetches discarded after a taken branch or jump.
    pub control_flushes: u64,
    /// No-ops inserted into ID/EX by stalls or interrupt entry.
    pub bubbles_inserted: u64,
    /// Interrupts accepted.
    pub interrupts_taken: u64,

    /// Execute operands taken from the EX/MEM register.
    pub forwards_from_memory: u64,
    /// Execute operands taken from the MEM/WB register.
    pub forwards_from_writeback: u64,
}

impl PipelineStats {
    /// Total data-stall cycles.
    pub const fn stall_cycles(&self) -> u64 {
        self.stalls_one_cycle + self.stalls_two_cycle
    }

    /// Instructions per cycle; zero before the first cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Cycles per instruction; zero before the first retirement.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Counts the bypassed operands of one Execute-stage forwarding plan.
    pub fn record_forwarding(&mut self, plan: &ForwardingPlan) {
        for source in plan.sources() {
            match source {
                ForwardSource::Memory => self.forwards_from_memory += 1,
                ForwardSource::Writeback => self.forwards_from_writeback += 1,
                ForwardSource::RegisterFile => {}
            }
        }
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "PIPELINE STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_insts                {}", self.instructions_retired)?;
        writeln!(f, "sim_ipc                  {:.4}", self.ipc())?;
        writeln!(f, "sim_cpi                  {:.4}", self.cpi())?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "HAZARDS")?;
        writeln!(f, "  stall.one_cycle        {}", self.stalls_one_cycle)?;
        writeln!(f, "  stall.two_cycle        {}", self.stalls_two_cycle)?;
        writeln!(f, "  flush.control          {}", self.control_flushes)?;
        writeln!(f, "  bubbles                {}", self.bubbles_inserted)?;
        writeln!(f, "  interrupts             {}", self.interrupts_taken)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "FORWARDING")?;
        writeln!(f, "  fwd.mem                {}", self.forwards_from_memory)?;
        writeln!(f, "  fwd.wb                 {}", self.forwards_from_writeback)?;
        write!(f, "==========================================================")
    }
}
