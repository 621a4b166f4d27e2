//! Next-PC Priority Tests.
//!
//! Interrupt > hold (stall) > branch target > sequential.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvpipe_core::core::arch::trap::{CAUSE_MACHINE_TIMER, InterruptRequest};
use rvpipe_core::core::pipeline::pc::{PcDecision, PcSource, select_next_pc};

const PC: u64 = 0x8000_0010;
const TARGET: u64 = 0x8000_0100;
const VECTOR: u64 = 0x8000_4000;

fn irq() -> InterruptRequest {
    InterruptRequest::raise(CAUSE_MACHINE_TIMER, VECTOR)
}

#[rstest]
#[case::sequential(false, None, false, PC + 4, PcSource::Sequential)]
#[case::branch(false, Some(TARGET), false, TARGET, PcSource::Branch)]
#[case::hold(true, None, false, PC, PcSource::Hold)]
#[case::hold_over_branch(true, Some(TARGET), false, PC, PcSource::Hold)]
#[case::interrupt(false, None, true, VECTOR, PcSource::Interrupt)]
#[case::interrupt_over_branch(false, Some(TARGET), true, VECTOR, PcSource::Interrupt)]
#[case::interrupt_over_hold(true, None, true, VECTOR, PcSource::Interrupt)]
#[case::interrupt_over_all(true, Some(TARGET), true, VECTOR, PcSource::Interrupt)]
fn priority(
    #[case] pc_stall: bool,
    #[case] branch: Option<u64>,
    #[case] interrupt: bool,
    #[case] next_pc: u64,
    #[case] source: PcSource,
) {
    let req = irq();
    let decision = select_next_pc(PC, pc_stall, branch, interrupt.then_some(&req));
    assert_eq!(decision, PcDecision { next_pc, source });
}

#[test]
fn sequential_wraps_at_top_of_address_space() {
    let d = select_next_pc(u64::MAX - 3, false, None, None);
    assert_eq!(d.next_pc, 0);
}
