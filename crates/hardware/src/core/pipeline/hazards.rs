//! Data/Control Hazard Detection and Forwarding.
//!
//! This module implements the logic that keeps overlapped execution equivalent
//! to sequential execution. It provides:
//! 1. **Hazard Detection:** Classifies each cycle as clear, data stall, or control hazard
//!    and derives the four stall/flush signals.
//! 2. **Operand Forwarding:** Resolves Read-After-Write (RAW) hazards by bypassing the
//!    register file from the EX/MEM and MEM/WB registers.
//!
//! Everything here is a pure function of the current cycle's inputs; there is no
//! state carried between cycles.

use serde::Serialize;

use crate::common::RegIdx;
use crate::core::pipeline::latches::InstSnapshot;
use crate::core::pipeline::signals::{
    DecodeProbe, ForwardSource, ForwardingPlan, HazardKind, HazardSignals, PipeStage, StageProbe,
    StallCause,
};

/// A potential read-after-write dependency between a producer in a later
/// stage and the two source registers of a consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterDependency {
    /// Stage the producing instruction occupies.
    pub producer: PipeStage,
    /// Destination register of the producer.
    pub rd: RegIdx,
    /// Source registers of the consumer.
    pub sources: [RegIdx; 2],
}

impl RegisterDependency {
    /// Creates a dependency candidate.
    pub const fn new(producer: PipeStage, rd: RegIdx, rs1: RegIdx, rs2: RegIdx) -> Self {
        Self {
            producer,
            rd,
            sources: [rs1, rs2],
        }
    }

    /// Returns `true` if the consumer reads the producer's destination.
    ///
    /// The zero register is never a dependency.
    #[inline]
    pub fn is_raw(&self) -> bool {
        !self.rd.is_zero() && self.sources.contains(&self.rd)
    }
}

/// Checks the one-cycle stall condition against the Execute stage.
///
/// True when the Decode instruction reads the destination of the instruction in
/// Execute and either that instruction is a load (classic load-use) or the
/// Decode instruction is a jump/branch that needs the value this cycle.
///
/// # Examples
///
/// ```
/// use rvpipe_core::common::RegIdx;
/// use rvpipe_core::core::pipeline::hazards::stall_one_cycle;
/// use rvpipe_core::core::pipeline::signals::{DecodeProbe, StageProbe};
///
/// // ID/EX: lw x5, 0(x2)   IF/ID: add x6, x5, x1
/// let id = DecodeProbe { rs1: RegIdx::new(5), rs2: RegIdx::new(1), ..Default::default() };
/// assert!(stall_one_cycle(&id, &StageProbe::load(RegIdx::new(5))));
/// ```
pub fn stall_one_cycle(id: &DecodeProbe, ex: &StageProbe) -> bool {
    (id.jump_needs_operand || ex.is_load)
        && RegisterDependency::new(PipeStage::Execute, ex.rd, id.rs1, id.rs2).is_raw()
}

/// Checks the two-cycle stall condition against the Memory stage.
///
/// True when a jump/branch in Decode reads the destination of a load that is
/// in Memory: the loaded value only exists at the end of this cycle, too late
/// for target computation in Decode.
pub fn stall_two_cycle(id: &DecodeProbe, mem: &StageProbe) -> bool {
    id.jump_needs_operand
        && mem.is_load
        && RegisterDependency::new(PipeStage::Memory, mem.rd, id.rs1, id.rs2).is_raw()
}

/// Classifies the current cycle.
///
/// Stalls dominate: a taken branch whose operands are still in flight was
/// resolved on stale values and is ignored until the stall clears.
///
/// # Arguments
///
/// * `id` - Decode-stage signals.
/// * `ex` - Execute-stage (ID/EX register) signals.
/// * `mem` - Memory-stage (EX/MEM register) signals.
pub fn classify(id: &DecodeProbe, ex: &StageProbe, mem: &StageProbe) -> HazardKind {
    if stall_one_cycle(id, ex) {
        HazardKind::DataStall(StallCause::OneCycle)
    } else if stall_two_cycle(id, mem) {
        HazardKind::DataStall(StallCause::TwoCycle)
    } else if id.branch_taken {
        HazardKind::Control
    } else {
        HazardKind::Clear
    }
}

/// Derives this cycle's stall and flush signals.
///
/// Data stall: `id_flush`, `pc_stall`, `if_stall`. Control hazard: `if_flush`
/// alone. The two patterns are mutually exclusive.
///
/// # Examples
///
/// ```
/// use rvpipe_core::common::RegIdx;
/// use rvpipe_core::core::pipeline::hazards::detect_hazards;
/// use rvpipe_core::core::pipeline::signals::{DecodeProbe, HazardSignals, StageProbe};
///
/// let id = DecodeProbe { branch_taken: true, ..Default::default() };
/// let none = StageProbe::default();
/// let signals = detect_hazards(&id, &none, &none);
/// assert_eq!(signals, HazardSignals { if_flush: true, ..HazardSignals::CLEAR });
/// ```
pub fn detect_hazards(id: &DecodeProbe, ex: &StageProbe, mem: &StageProbe) -> HazardSignals {
    classify(id, ex, mem).into()
}

/// Selects the source of one operand.
///
/// EX/MEM wins over MEM/WB because it holds the younger producer. A load in
/// EX/MEM is never a source: its data is not available until write-back, and
/// the stall conditions keep every consumer that would need it waiting.
///
/// # Arguments
///
/// * `src` - Source register of the consumer.
/// * `ex_mem` - Instruction in the EX/MEM register.
/// * `mem_wb` - Instruction in the MEM/WB register.
pub fn select_source(src: RegIdx, ex_mem: &InstSnapshot, mem_wb: &InstSnapshot) -> ForwardSource {
    if src.is_zero() {
        ForwardSource::RegisterFile
    } else if ex_mem.writes_register() && !ex_mem.ctrl.mem_read && ex_mem.rd == src {
        ForwardSource::Memory
    } else if mem_wb.writes_register() && mem_wb.rd == src {
        ForwardSource::Writeback
    } else {
        ForwardSource::RegisterFile
    }
}

/// Operand values after forwarding, with the selections that produced them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Forwarded {
    /// Value for `rs1`.
    pub op1: u64,
    /// Value for `rs2`.
    pub op2: u64,
    /// Where each value came from.
    pub plan: ForwardingPlan,
}

/// Forwards register values to `consumer` from the EX/MEM and MEM/WB registers.
///
/// Used twice per cycle: in Decode with register-file reads as the base
/// values, and in Execute with the operands captured in ID/EX as the base.
///
/// # Arguments
///
/// * `consumer` - Instruction whose `rs1`/`rs2` are being resolved.
/// * `base` - Values used when no forwarding applies, as `[rs1, rs2]`.
/// * `ex_mem` - Instruction in the EX/MEM register.
/// * `mem_wb` - Instruction in the MEM/WB register.
pub fn forward_rs(
    consumer: &InstSnapshot,
    base: [u64; 2],
    ex_mem: &InstSnapshot,
    mem_wb: &InstSnapshot,
) -> Forwarded {
    let pick = |source: ForwardSource, fallback: u64| match source {
        ForwardSource::RegisterFile => fallback,
        ForwardSource::Memory => ex_mem.result,
        ForwardSource::Writeback => mem_wb.writeback_value(),
    };

    let plan = ForwardingPlan {
        rs1: select_source(consumer.rs1, ex_mem, mem_wb),
        rs2: select_source(consumer.rs2, ex_mem, mem_wb),
    };

    Forwarded {
        op1: pick(plan.rs1, base[0]),
        op2: pick(plan.rs2, base[1]),
        plan,
    }
}
