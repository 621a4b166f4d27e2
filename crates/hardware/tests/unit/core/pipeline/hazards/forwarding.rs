//! Data Forwarding Tests.
//!
//! Verifies operand source selection:
//! - EX/MEM (Memory) has priority over MEM/WB (Writeback).
//! - A load in EX/MEM is never a source.
//! - `x0` is never forwarded.
//! - The Writeback value is load data for loads, the result otherwise.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvpipe_core::common::RegIdx;
use rvpipe_core::core::pipeline::hazards::{forward_rs, select_source};
use rvpipe_core::core::pipeline::latches::InstSnapshot;
use rvpipe_core::core::pipeline::signals::{ForwardSource, ForwardingPlan, OpClass};

use crate::common::builder::snapshot::{SnapshotBuilder, alu, consumer, load, store};

const BASE: [u64; 2] = [111, 222];

fn bubble() -> InstSnapshot {
    InstSnapshot::bubble()
}

// ══════════════════════════════════════════════════════════
// 1. Source selection
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::no_producers(bubble(), bubble(), ForwardSource::RegisterFile)]
#[case::memory(alu(5, 1), bubble(), ForwardSource::Memory)]
#[case::writeback(bubble(), alu(5, 1), ForwardSource::Writeback)]
#[case::memory_over_writeback(alu(5, 1), alu(5, 2), ForwardSource::Memory)]
#[case::load_in_memory_skipped(load(5, 1), bubble(), ForwardSource::RegisterFile)]
#[case::load_in_memory_falls_back_to_writeback(load(5, 1), alu(5, 2), ForwardSource::Writeback)]
#[case::load_in_writeback(bubble(), load(5, 1), ForwardSource::Writeback)]
#[case::other_register(alu(6, 1), alu(7, 2), ForwardSource::RegisterFile)]
#[case::store_never_produces(store(5, 5), bubble(), ForwardSource::RegisterFile)]
fn source_selection(
    #[case] ex_mem: InstSnapshot,
    #[case] mem_wb: InstSnapshot,
    #[case] expected: ForwardSource,
) {
    assert_eq!(select_source(RegIdx::new(5), &ex_mem, &mem_wb), expected);
}

#[test]
fn x0_is_never_forwarded() {
    // A producer with rd = 0 and reg_write set, as a decoder might emit for `addi x0, x0, 1`.
    let writer = SnapshotBuilder::new(OpClass::Alu).rd(0).result(99).build();
    assert_eq!(select_source(RegIdx::ZERO, &writer, &writer), ForwardSource::RegisterFile);

    let fwd = forward_rs(&consumer(0, 0), [0, 0], &writer, &writer);
    assert_eq!(fwd.op1, 0);
    assert_eq!(fwd.op2, 0);
}

#[test]
fn non_writing_producer_is_ignored() {
    // Branch with rd field left non-zero must not forward.
    let branch = SnapshotBuilder::new(OpClass::Branch).rd(5).result(7).build();
    assert_eq!(select_source(RegIdx::new(5), &branch, &bubble()), ForwardSource::RegisterFile);
}

// ══════════════════════════════════════════════════════════
// 2. Forwarded values
// ══════════════════════════════════════════════════════════

#[test]
fn forward_from_memory_uses_result() {
    let fwd = forward_rs(&consumer(5, 1), BASE, &alu(5, 42), &bubble());
    assert_eq!(fwd.op1, 42);
    assert_eq!(fwd.op2, 222);
    assert_eq!(
        fwd.plan,
        ForwardingPlan {
            rs1: ForwardSource::Memory,
            rs2: ForwardSource::RegisterFile,
        }
    );
}

#[test]
fn forward_load_from_writeback_uses_load_data() {
    let fwd = forward_rs(&consumer(1, 5), BASE, &bubble(), &load(5, 0xABCD));
    assert_eq!(fwd.op2, 0xABCD);
    assert_eq!(fwd.plan.rs2, ForwardSource::Writeback);
}

#[test]
fn both_operands_from_different_stages() {
    let fwd = forward_rs(&consumer(5, 6), BASE, &alu(5, 10), &alu(6, 20));
    assert_eq!((fwd.op1, fwd.op2), (10, 20));
    assert_eq!(
        fwd.plan.sources().collect::<Vec<_>>(),
        vec![ForwardSource::Memory, ForwardSource::Writeback]
    );
}

#[test]
fn same_register_on_both_operands() {
    let fwd = forward_rs(&consumer(5, 5), BASE, &alu(5, 10), &alu(5, 20));
    assert_eq!((fwd.op1, fwd.op2), (10, 10));
}

#[test]
fn no_match_keeps_base_values() {
    let fwd = forward_rs(&consumer(1, 2), BASE, &alu(5, 10), &load(6, 20));
    assert_eq!((fwd.op1, fwd.op2), (111, 222));
    assert_eq!(fwd.plan, ForwardingPlan::default());
}
