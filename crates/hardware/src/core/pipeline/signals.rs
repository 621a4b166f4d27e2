//! Pipeline control signals and hazard-unit interface types.
//!
//! This module defines the values that flow between the pipeline stages and
//! the hazard/forwarding unit. It provides:
//! 1. **Instruction Control:** Opcode classes and the control flags decoded from them.
//! 2. **Hazard Inputs:** Per-cycle probes of the Decode, Execute, and Memory stages.
//! 3. **Hazard Outputs:** The four stall/flush signals and their classification.
//! 4. **Forwarding:** Operand source selections produced by the forwarding unit.

use serde::Serialize;

use crate::common::RegIdx;

/// Pipeline stage positions, youngest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PipeStage {
    /// Instruction fetch (IF).
    Fetch,
    /// Instruction decode and branch resolution (ID).
    Decode,
    /// Execute (EX).
    Execute,
    /// Memory access (MEM).
    Memory,
    /// Register write-back (WB).
    Writeback,
}

/// Coarse opcode class of an instruction in flight.
///
/// The hazard and forwarding units only need to know how an instruction uses
/// the register file and whether it redirects control flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum OpClass {
    /// No operation (bubble, flushed slot, or architectural NOP).
    #[default]
    Nop,
    /// Register/immediate arithmetic (OP, OP-IMM, LUI, AUIPC).
    Alu,
    /// Memory load.
    Load,
    /// Memory store.
    Store,
    /// Conditional branch, compared in Decode.
    Branch,
    /// Direct jump (JAL); target needs no register operand.
    Jal,
    /// Indirect jump (JALR); target needs `rs1` in Decode.
    Jalr,
    /// CSR access or other system instruction.
    System,
}

impl OpClass {
    /// Returns `true` if Decode must read register operands to resolve this
    /// instruction's control flow.
    #[inline]
    pub const fn needs_operand_in_decode(self) -> bool {
        matches!(self, Self::Branch | Self::Jalr)
    }

    /// Returns `true` if this instruction can redirect the PC from Decode.
    #[inline]
    pub const fn is_control_flow(self) -> bool {
        matches!(self, Self::Branch | Self::Jal | Self::Jalr)
    }
}

/// Control signals carried alongside an instruction through the pipeline.
///
/// A flushed pipeline register carries `ControlSignals::default()`, which
/// neither writes a register nor touches memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ControlSignals {
    /// Enable write to the destination register.
    pub reg_write: bool,
    /// Enable memory read operation (load).
    pub mem_read: bool,
    /// Enable memory write operation (store).
    pub mem_write: bool,
    /// Instruction is a conditional branch.
    pub branch: bool,
    /// Instruction is an unconditional jump (JAL/JALR).
    pub jump: bool,
    /// Decode must read operands to resolve the jump/branch target.
    pub jump_needs_operand: bool,
}

impl From<OpClass> for ControlSignals {
    fn from(class: OpClass) -> Self {
        match class {
            OpClass::Nop => Self::default(),
            OpClass::Alu | OpClass::System => Self {
                reg_write: true,
                ..Self::default()
            },
            OpClass::Load => Self {
                reg_write: true,
                mem_read: true,
                ..Self::default()
            },
            OpClass::Store => Self {
                mem_write: true,
                ..Self::default()
            },
            OpClass::Branch => Self {
                branch: true,
                jump_needs_operand: true,
                ..Self::default()
            },
            OpClass::Jal => Self {
                reg_write: true,
                jump: true,
                ..Self::default()
            },
            OpClass::Jalr => Self {
                reg_write: true,
                jump: true,
                jump_needs_operand: true,
                ..Self::default()
            },
        }
    }
}

/// Signals observed from the Decode stage each cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecodeProbe {
    /// The Decode instruction is a jump/branch that reads register operands.
    pub jump_needs_operand: bool,
    /// The Decode instruction resolved as a taken branch or jump.
    pub branch_taken: bool,
    /// First source register read in Decode.
    pub rs1: RegIdx,
    /// Second source register read in Decode.
    pub rs2: RegIdx,
}

/// Signals observed from the Execute-stage or Memory-stage pipeline register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageProbe {
    /// The instruction in this stage is a pending load.
    pub is_load: bool,
    /// Destination register of the instruction in this stage.
    pub rd: RegIdx,
}

impl StageProbe {
    /// A probe of a stage holding a load into `rd`.
    pub const fn load(rd: RegIdx) -> Self {
        Self { is_load: true, rd }
    }

    /// A probe of a stage holding a non-load instruction writing `rd`.
    pub const fn non_load(rd: RegIdx) -> Self {
        Self { is_load: false, rd }
    }
}

/// Which data dependency forced a stall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StallCause {
    /// Producer one stage ahead in Execute: a load feeding any consumer, or
    /// any producer feeding a jump/branch operand.
    OneCycle,
    /// Load two stages ahead in Memory feeding a jump/branch operand.
    TwoCycle,
}

/// Per-cycle hazard classification, in priority order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum HazardKind {
    /// No hazard: normal advance.
    #[default]
    Clear,
    /// Data hazard: hold Fetch and Decode, insert a bubble into Execute.
    DataStall(StallCause),
    /// Control hazard: discard the wrong-path instruction in IF/ID.
    Control,
}

/// Stall and flush signals emitted by the hazard unit for one cycle.
///
/// Computed fresh every cycle; there is no state carried between cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct HazardSignals {
    /// Hold the fetch PC.
    pub pc_stall: bool,
    /// Hold the IF/ID register so Decode sees the same instruction next cycle.
    pub if_stall: bool,
    /// Clear the ID/EX register (insert a bubble into Execute).
    pub id_flush: bool,
    /// Clear the IF/ID register (discard the wrong-path fetch).
    pub if_flush: bool,
}

impl HazardSignals {
    /// All signals deasserted.
    pub const CLEAR: Self = Self {
        pc_stall: false,
        if_stall: false,
        id_flush: false,
        if_flush: false,
    };

    /// Returns `true` if any signal is asserted.
    #[inline]
    pub const fn any(&self) -> bool {
        self.pc_stall || self.if_stall || self.id_flush || self.if_flush
    }

    /// Returns `true` for the data-hazard stall pattern.
    #[inline]
    pub const fn is_stall(&self) -> bool {
        self.pc_stall && self.if_stall && self.id_flush
    }
}

impl From<HazardKind> for HazardSignals {
    fn from(kind: HazardKind) -> Self {
        match kind {
            HazardKind::Clear => Self::CLEAR,
            HazardKind::DataStall(_) => Self {
                pc_stall: true,
                if_stall: true,
                id_flush: true,
                if_flush: false,
            },
            HazardKind::Control => Self {
                if_flush: true,
                ..Self::CLEAR
            },
        }
    }
}

/// Where an operand's value is taken from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ForwardSource {
    /// Architectural register file (no forwarding).
    #[default]
    RegisterFile,
    /// Result of the instruction in the EX/MEM register.
    Memory,
    /// Write-back value of the instruction in the MEM/WB register.
    Writeback,
}

/// Forwarding selections for both source operands of one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ForwardingPlan {
    /// Source for the `rs1` operand.
    pub rs1: ForwardSource,
    /// Source for the `rs2` operand.
    pub rs2: ForwardSource,
}

impl ForwardingPlan {
    /// Iterates over both selections.
    pub fn sources(&self) -> impl Iterator<Item = ForwardSource> {
        [self.rs1, self.rs2].into_iter()
    }
}
