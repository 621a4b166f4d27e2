//! Cycle driver for the 5-stage pipeline.
//!
//! This module ties the hazard/forwarding unit, the latch file, and the PC
//! arbiter into one clocked unit. It provides:
//! 1. **`Pipeline`:** Owns the PC, latches, and statistics; advances one cycle per `tick`.
//! 2. **`CycleReport`:** What the control logic decided in a cycle.
//!
//! Every stage reads the state committed at the end of the previous cycle; all
//! pipeline registers, the register file, and the PC are updated together at
//! the end of `tick`.

use serde::Serialize;
use tracing::{debug, trace};

use crate::common::ConfigError;
use crate::config::Config;
use crate::core::arch::trap::InterruptRequest;
use crate::core::pipeline::hazards::{Forwarded, classify, forward_rs};
use crate::core::pipeline::latches::{Boundary, InstSnapshot, LatchFile};
use crate::core::pipeline::pc::{PcDecision, select_next_pc};
use crate::core::pipeline::signals::{
    DecodeProbe, ForwardingPlan, HazardKind, HazardSignals, StallCause,
};
use crate::core::pipeline::traits::{Datapath, TrapController};
use crate::stats::PipelineStats;

/// Control decisions taken in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Cycle number, starting at 1 for the first `tick` after reset.
    pub cycle: u64,
    /// Hazard classification of the cycle.
    pub hazard: HazardKind,
    /// Signals emitted by the hazard unit.
    pub signals: HazardSignals,
    /// Next-PC selection.
    pub pc: PcDecision,
    /// Operand sources used by Decode.
    pub id_forwarding: ForwardingPlan,
    /// Operand sources used by Execute.
    pub ex_forwarding: ForwardingPlan,
    /// Interrupt accepted this cycle, if any.
    pub interrupt: Option<InterruptRequest>,
    /// An instruction completed write-back this cycle.
    pub retired: bool,
}

/// Outputs of the Decode stage for one cycle.
struct DecodeOutput {
    snapshot: InstSnapshot,
    probe: DecodeProbe,
    branch_target: Option<u64>,
    forwarding: ForwardingPlan,
}

/// In-order, single-issue, 5-stage pipeline.
///
/// `D` supplies the functional units and `T` the interrupt source; the
/// pipeline only decides when stages advance and which operand values they see.
#[derive(Debug)]
pub struct Pipeline<D, T> {
    config: Config,
    pc: u64,
    cycle: u64,
    latches: LatchFile,
    stats: PipelineStats,
    datapath: D,
    traps: T,
}

impl<D: Datapath, T: TrapController> Pipeline<D, T> {
    /// Creates a pipeline in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - Driver configuration; validated before use.
    /// * `datapath` - Functional units and register file.
    /// * `traps` - Interrupt source and CSR holder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: Config, datapath: D, traps: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pc: config.general.reset_pc,
            config,
            cycle: 0,
            latches: LatchFile::new(),
            stats: PipelineStats::default(),
            datapath,
            traps,
        })
    }

    /// Returns every latch to Idle, the PC to the reset vector, and clears statistics.
    ///
    /// The datapath and trap controller are left untouched.
    pub fn reset(&mut self) {
        self.pc = self.config.general.reset_pc;
        self.cycle = 0;
        self.latches = LatchFile::new();
        self.stats = PipelineStats::default();
    }

    /// Advances the pipeline by `cycles` clock edges.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            let _ = self.tick();
        }
    }

    /// Advances the pipeline by one clock edge.
    pub fn tick(&mut self) -> CycleReport {
        self.cycle += 1;

        let id_ex = *self.latches.entry(Boundary::IdEx);
        let ex_mem = *self.latches.entry(Boundary::ExMem);
        let mem_wb = *self.latches.entry(Boundary::MemWb);

        let decoded = self.decode(&ex_mem, &mem_wb);
        let (executed, ex_fwd) = self.execute(&id_ex, &ex_mem, &mem_wb);
        let accessed = self.memory(&ex_mem);

        let hazard = classify(&decoded.probe, &id_ex.probe(), &ex_mem.probe());
        let signals = HazardSignals::from(hazard);
        let interrupt = self.sample_interrupt();

        let pc = select_next_pc(
            self.pc,
            signals.pc_stall,
            decoded.branch_target,
            interrupt.as_ref(),
        );

        // Commit.
        let retired = !mem_wb.is_nop();
        if mem_wb.writes_register() {
            self.datapath.write_back(&mem_wb, mem_wb.writeback_value());
        }
        self.latches[Boundary::MemWb].capture(accessed);
        self.latches[Boundary::ExMem].capture(executed);

        if let Some(req) = interrupt.as_ref() {
            let if_id = &self.latches[Boundary::IfId];
            let epc = if if_id.holds_instruction() {
                if_id.entry().pc
            } else {
                self.pc
            };
            self.latches[Boundary::IdEx].clear();
            self.latches[Boundary::IfId].clear();
            self.traps.enter_trap(req, epc);
            debug!(
                cycle = self.cycle,
                cause = format_args!("{:#x}", req.cause),
                epc = format_args!("{epc:#x}"),
                vector = format_args!("{:#x}", req.vector),
                "interrupt taken"
            );
        } else {
            if signals.id_flush {
                self.latches[Boundary::IdEx].clear();
            } else {
                self.latches[Boundary::IdEx].capture(decoded.snapshot);
            }

            if signals.if_flush {
                self.latches[Boundary::IfId].clear();
            } else if signals.if_stall {
                self.latches[Boundary::IfId].hold();
            } else {
                let fetched = self.datapath.fetch(self.pc);
                self.latches[Boundary::IfId].capture(fetched);
            }

            match hazard {
                HazardKind::DataStall(cause) => debug!(
                    cycle = self.cycle,
                    pc = format_args!("{:#x}", decoded.snapshot.pc),
                    ?cause,
                    "data stall"
                ),
                HazardKind::Control => debug!(
                    cycle = self.cycle,
                    pc = format_args!("{:#x}", decoded.snapshot.pc),
                    target = format_args!("{:#x}", pc.next_pc),
                    "control flush"
                ),
                HazardKind::Clear => {}
            }
        }

        self.pc = pc.next_pc;

        let report = CycleReport {
            cycle: self.cycle,
            hazard,
            signals,
            pc,
            id_forwarding: decoded.forwarding,
            ex_forwarding: ex_fwd.plan,
            interrupt,
            retired,
        };
        self.record(&report, &id_ex);

        if self.config.general.trace_cycles {
            trace!(
                cycle = self.cycle,
                next_pc = format_args!("{:#x}", pc.next_pc),
                source = ?pc.source,
                ?signals,
                "cycle"
            );
        }

        report
    }

    /// Decode: register read, ID-stage forwarding, branch resolution.
    fn decode(&mut self, ex_mem: &InstSnapshot, mem_wb: &InstSnapshot) -> DecodeOutput {
        let inst = *self.latches.entry(Boundary::IfId);
        let base = [
            self.datapath.read_register(inst.rs1),
            self.datapath.read_register(inst.rs2),
        ];
        let Forwarded { op1, op2, plan } = forward_rs(&inst, base, ex_mem, mem_wb);

        let branch_target = if inst.class.is_control_flow() {
            self.datapath.resolve_branch(&inst, op1, op2)
        } else {
            None
        };

        let probe = DecodeProbe {
            jump_needs_operand: inst.ctrl.jump_needs_operand,
            branch_taken: branch_target.is_some(),
            rs1: inst.rs1,
            rs2: inst.rs2,
        };

        DecodeOutput {
            snapshot: InstSnapshot { op1, op2, ..inst },
            probe,
            branch_target,
            forwarding: plan,
        }
    }

    /// Execute: EX-stage forwarding over the operands captured in Decode.
    fn execute(
        &mut self,
        id_ex: &InstSnapshot,
        ex_mem: &InstSnapshot,
        mem_wb: &InstSnapshot,
    ) -> (InstSnapshot, Forwarded) {
        let fwd = forward_rs(id_ex, [id_ex.op1, id_ex.op2], ex_mem, mem_wb);
        if id_ex.is_nop() {
            return (*id_ex, fwd);
        }
        let result = self.datapath.execute(id_ex, fwd.op1, fwd.op2);
        let out = InstSnapshot {
            op1: fwd.op1,
            op2: fwd.op2,
            result,
            ..*id_ex
        };
        (out, fwd)
    }

    /// Memory: load or store of the EX/MEM instruction.
    fn memory(&mut self, ex_mem: &InstSnapshot) -> InstSnapshot {
        let mut out = *ex_mem;
        if ex_mem.ctrl.mem_read || ex_mem.ctrl.mem_write {
            let data = self.datapath.memory(ex_mem);
            if ex_mem.ctrl.mem_read {
                out.load_data = data;
            }
        }
        out
    }

    /// Samples the interrupt lines; `Some` only if the request is accepted.
    fn sample_interrupt(&mut self) -> Option<InterruptRequest> {
        if !self.config.pipeline.accept_interrupts {
            return None;
        }
        let req = self.traps.poll();
        (req.pending && self.traps.interrupts_enabled()).then_some(req)
    }

    fn record(&mut self, report: &CycleReport, id_ex: &InstSnapshot) {
        let stats = &mut self.stats;
        stats.cycles += 1;
        if report.retired {
            stats.instructions_retired += 1;
        }
        if report.interrupt.is_some() {
            stats.interrupts_taken += 1;
            stats.bubbles_inserted += 1;
        } else {
            match report.hazard {
                HazardKind::DataStall(StallCause::OneCycle) => {
                    stats.stalls_one_cycle += 1;
                    stats.bubbles_inserted += 1;
                }
                HazardKind::DataStall(StallCause::TwoCycle) => {
                    stats.stalls_two_cycle += 1;
                    stats.bubbles_inserted += 1;
                }
                HazardKind::Control => stats.control_flushes += 1,
                HazardKind::Clear => {}
            }
        }
        if !id_ex.is_nop() {
            stats.record_forwarding(&report.ex_forwarding);
        }
    }

    /// Current fetch PC.
    pub const fn pc(&self) -> u64 {
        self.pc
    }

    /// Number of cycles since reset.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Pipeline registers as committed at the end of the last cycle.
    pub const fn latches(&self) -> &LatchFile {
        &self.latches
    }

    /// Statistics since reset.
    pub const fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Driver configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Functional units and register file.
    pub const fn datapath(&self) -> &D {
        &self.datapath
    }

    /// Mutable access to the datapath.
    pub const fn datapath_mut(&mut self) -> &mut D {
        &mut self.datapath
    }

    /// Interrupt source and CSR holder.
    pub const fn trap_controller(&self) -> &T {
        &self.traps
    }

    /// Mutable access to the trap controller.
    pub const fn trap_controller_mut(&mut self) -> &mut T {
        &mut self.traps
    }
}
