//! Next-PC Selection.
//!
//! The fetch PC is chosen once per cycle from four candidates in fixed
//! priority: interrupt vector, hold, branch target, sequential.

use serde::Serialize;

use crate::common::INSTRUCTION_SIZE;
use crate::core::arch::trap::InterruptRequest;

/// Which candidate produced the next fetch PC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PcSource {
    /// `pc + 4`.
    #[default]
    Sequential,
    /// Target of a taken branch or jump resolved in Decode.
    Branch,
    /// Handler vector of an accepted interrupt.
    Interrupt,
    /// Current PC retained by a data stall.
    Hold,
}

/// Result of next-PC selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PcDecision {
    /// Address fetched next cycle.
    pub next_pc: u64,
    /// Candidate that won.
    pub source: PcSource,
}

/// Selects the next fetch PC.
///
/// An accepted interrupt wins over everything, including a stall: the stalled
/// Decode instruction is squashed and re-executed after the handler returns.
/// A stall wins over a branch target, which was resolved on stale operands.
///
/// # Arguments
///
/// * `pc` - Current fetch PC.
/// * `pc_stall` - Hazard unit's hold signal.
/// * `branch_target` - Target if the Decode instruction resolved as taken.
/// * `interrupt` - Request accepted this cycle, if any.
///
/// # Examples
///
/// ```
/// use rvpipe_core::core::pipeline::pc::{PcSource, select_next_pc};
///
/// let d = select_next_pc(0x8000_0000, false, Some(0x8000_0040), None);
/// assert_eq!(d.next_pc, 0x8000_0040);
/// assert_eq!(d.source, PcSource::Branch);
/// ```
pub const fn select_next_pc(
    pc: u64,
    pc_stall: bool,
    branch_target: Option<u64>,
    interrupt: Option<&InterruptRequest>,
) -> PcDecision {
    if let Some(req) = interrupt {
        return PcDecision {
            next_pc: req.vector,
            source: PcSource::Interrupt,
        };
    }
    if pc_stall {
        return PcDecision {
            next_pc: pc,
            source: PcSource::Hold,
        };
    }
    match branch_target {
        Some(target) => PcDecision {
            next_pc: target,
            source: PcSource::Branch,
        },
        None => PcDecision {
            next_pc: pc.wrapping_add(INSTRUCTION_SIZE),
            source: PcSource::Sequential,
        },
    }
}
