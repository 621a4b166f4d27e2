//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the four pipeline registers of the 5-stage pipeline:
//! Fetch → IF/ID → Decode → ID/EX → Execute → EX/MEM → Memory → MEM/WB → Writeback.
//!
//! 1. **Instruction Snapshot:** One record type carries an instruction's decoded and
//!    computed fields through every boundary.
//! 2. **Latch State Machine:** Each register is Idle, Loaded, Held, or Cleared, with
//!    capture/hold/clear as explicit transitions.
//! 3. **Latch File:** The four registers live in a fixed array indexed by boundary.

use std::ops::{Index, IndexMut};

use serde::Serialize;

use crate::common::{INSTRUCTION_NOP, RegIdx};
use crate::core::pipeline::signals::{ControlSignals, OpClass, StageProbe};
use crate::core::pipeline::traits::PipelineLatch;

/// Snapshot of one instruction in flight.
///
/// Fields are filled progressively: Fetch supplies the decoded fields, Decode
/// the operands, Execute the result, Memory the load data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InstSnapshot {
    /// Program counter of the instruction.
    pub pc: u64,
    /// 32-bit instruction encoding.
    pub inst: u32,
    /// Coarse opcode class.
    pub class: OpClass,
    /// First source register index (rs1).
    pub rs1: RegIdx,
    /// Second source register index (rs2).
    pub rs2: RegIdx,
    /// Destination register index (rd).
    pub rd: RegIdx,
    /// Sign-extended immediate value.
    pub imm: i64,
    /// Control signals for downstream stages.
    pub ctrl: ControlSignals,
    /// Operand A as captured in Decode (after ID-stage forwarding).
    pub op1: u64,
    /// Operand B as captured in Decode; store data once forwarded in Execute.
    pub op2: u64,
    /// Execute result: ALU value, effective address, or link address.
    pub result: u64,
    /// Data loaded from memory.
    pub load_data: u64,
}

impl Default for InstSnapshot {
    fn default() -> Self {
        Self::bubble()
    }
}

impl InstSnapshot {
    /// Creates a decoded instruction snapshot with control signals derived
    /// from its class.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the instruction.
    /// * `inst` - Raw encoding.
    /// * `class` - Opcode class.
    pub fn decoded(pc: u64, inst: u32, class: OpClass) -> Self {
        Self {
            pc,
            inst,
            class,
            ctrl: ControlSignals::from(class),
            ..Self::bubble()
        }
    }

    /// The canonical no-op: NOP encoding, zeroed registers and control flags.
    pub const fn bubble() -> Self {
        Self {
            pc: 0,
            inst: INSTRUCTION_NOP,
            class: OpClass::Nop,
            rs1: RegIdx::ZERO,
            rs2: RegIdx::ZERO,
            rd: RegIdx::ZERO,
            imm: 0,
            ctrl: ControlSignals {
                reg_write: false,
                mem_read: false,
                mem_write: false,
                branch: false,
                jump: false,
                jump_needs_operand: false,
            },
            op1: 0,
            op2: 0,
            result: 0,
            load_data: 0,
        }
    }

    /// Sets the destination register.
    #[must_use]
    pub const fn with_rd(mut self, rd: RegIdx) -> Self {
        self.rd = rd;
        self
    }

    /// Sets the source registers.
    #[must_use]
    pub const fn with_sources(mut self, rs1: RegIdx, rs2: RegIdx) -> Self {
        self.rs1 = rs1;
        self.rs2 = rs2;
        self
    }

    /// Sets the immediate.
    #[must_use]
    pub const fn with_imm(mut self, imm: i64) -> Self {
        self.imm = imm;
        self
    }

    /// Returns `true` if this slot carries no operation.
    #[inline]
    pub const fn is_nop(&self) -> bool {
        matches!(self.class, OpClass::Nop)
    }

    /// Returns `true` if this instruction writes a non-zero destination register.
    #[inline]
    pub const fn writes_register(&self) -> bool {
        self.ctrl.reg_write && !self.rd.is_zero()
    }

    /// Value this instruction writes back: load data for loads, the Execute
    /// result otherwise.
    #[inline]
    pub const fn writeback_value(&self) -> u64 {
        if self.ctrl.mem_read {
            self.load_data
        } else {
            self.result
        }
    }

    /// Hazard-unit view of this instruction when it occupies Execute or Memory.
    ///
    /// Instructions that do not write a register report `x0`, which the hazard
    /// unit never matches.
    pub const fn probe(&self) -> StageProbe {
        StageProbe {
            is_load: self.ctrl.mem_read,
            rd: if self.ctrl.reg_write {
                self.rd
            } else {
                RegIdx::ZERO
            },
        }
    }
}

/// State of a pipeline register after the most recent clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LatchState {
    /// Reset state; never loaded. Presents a no-op.
    #[default]
    Idle,
    /// Captured the upstream stage's output.
    Loaded,
    /// Retained its previous contents; the upstream output was discarded.
    Held,
    /// Overwritten with the canonical no-op for this cycle.
    Cleared,
}

/// A single pipeline register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Latch {
    entry: InstSnapshot,
    state: LatchState,
}

impl Latch {
    /// Creates an idle latch presenting a no-op.
    pub const fn new() -> Self {
        Self {
            entry: InstSnapshot::bubble(),
            state: LatchState::Idle,
        }
    }

    /// Instruction currently presented to the downstream stage.
    #[inline]
    pub const fn entry(&self) -> &InstSnapshot {
        &self.entry
    }

    /// State after the most recent transition.
    #[inline]
    pub const fn state(&self) -> LatchState {
        self.state
    }

    /// Returns `true` if the latch carries an instruction that entered from
    /// upstream (as opposed to a reset or flush bubble).
    #[inline]
    pub const fn holds_instruction(&self) -> bool {
        matches!(self.state, LatchState::Loaded | LatchState::Held)
    }

    /// Normal clock edge: capture the upstream output.
    pub fn capture(&mut self, entry: InstSnapshot) {
        self.entry = entry;
        self.state = LatchState::Loaded;
    }

    /// Stalled clock edge: keep the current contents.
    pub fn hold(&mut self) {
        self.state = LatchState::Held;
    }

    /// Flushed clock edge: replace the contents with the canonical no-op.
    pub fn clear(&mut self) {
        self.entry = InstSnapshot::bubble();
        self.state = LatchState::Cleared;
    }
}

impl PipelineLatch for Latch {
    fn flush(&mut self) {
        self.clear();
    }

    fn is_bubble(&self) -> bool {
        self.entry.is_nop()
    }
}

/// Stage boundary a pipeline register sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Boundary {
    /// Fetch to Decode.
    IfId = 0,
    /// Decode to Execute.
    IdEx = 1,
    /// Execute to Memory.
    ExMem = 2,
    /// Memory to Write-back.
    MemWb = 3,
}

impl Boundary {
    /// All boundaries in pipeline order.
    pub const ALL: [Self; 4] = [Self::IfId, Self::IdEx, Self::ExMem, Self::MemWb];

    /// Short mnemonic used in traces.
    pub const fn name(self) -> &'static str {
        match self {
            Self::IfId => "IF/ID",
            Self::IdEx => "ID/EX",
            Self::ExMem => "EX/MEM",
            Self::MemWb => "MEM/WB",
        }
    }
}

/// The four pipeline registers, indexed by [`Boundary`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LatchFile {
    slots: [Latch; 4],
}

impl LatchFile {
    /// Creates a latch file with every register idle.
    pub const fn new() -> Self {
        Self {
            slots: [Latch::new(); 4],
        }
    }

    /// Instruction presented by the register on `boundary`.
    #[inline]
    pub fn entry(&self, boundary: Boundary) -> &InstSnapshot {
        self[boundary].entry()
    }

    /// Iterates over `(boundary, latch)` pairs in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (Boundary, &Latch)> {
        Boundary::ALL.into_iter().zip(self.slots.iter())
    }

    /// Returns `true` if every register presents a no-op.
    pub fn is_drained(&self) -> bool {
        self.slots.iter().all(PipelineLatch::is_bubble)
    }
}

impl Index<Boundary> for LatchFile {
    type Output = Latch;

    fn index(&self, boundary: Boundary) -> &Latch {
        &self.slots[boundary as usize]
    }
}

impl IndexMut<Boundary> for LatchFile {
    fn index_mut(&mut self, boundary: Boundary) -> &mut Latch {
        &mut self.slots[boundary as usize]
    }
}

impl PipelineLatch for LatchFile {
    fn flush(&mut self) {
        for slot in &mut self.slots {
            slot.flush();
        }
    }

    fn is_bubble(&self) -> bool {
        self.is_drained()
    }
}
