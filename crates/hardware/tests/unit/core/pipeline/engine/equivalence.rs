//! Pipeline/Sequential Equivalence Tests.
//!
//! Random straight-line and forward-branching programs are run both through
//! the pipeline and through a one-instruction-at-a-time interpreter; the final
//! register file and memory must match.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::harness::{TestContext, run_sequential};
use crate::common::mocks::datapath::{ToyOp, ToyState};

/// Registers x0..x5: few enough that dependencies are dense.
fn reg() -> std::ops::Range<u8> {
    0..6
}

fn op() -> impl Strategy<Value = ToyOp> {
    prop_oneof![
        1 => Just(ToyOp::Nop),
        3 => (reg(), reg(), -4i64..=4).prop_map(|(rd, rs1, imm)| ToyOp::Addi { rd, rs1, imm }),
        3 => (reg(), reg(), reg()).prop_map(|(rd, rs1, rs2)| ToyOp::Add { rd, rs1, rs2 }),
        3 => (reg(), reg(), 0i64..4).prop_map(|(rd, rs1, k)| ToyOp::Load { rd, rs1, imm: k * 8 }),
        2 => (reg(), reg(), 0i64..4).prop_map(|(rs1, rs2, k)| ToyOp::Store { rs1, rs2, imm: k * 8 }),
        2 => (reg(), reg(), 1i64..=3).prop_map(|(rs1, rs2, k)| ToyOp::Beq { rs1, rs2, offset: k * 4 }),
        2 => (reg(), reg(), 1i64..=3).prop_map(|(rs1, rs2, k)| ToyOp::Bne { rs1, rs2, offset: k * 4 }),
        1 => (reg(), 1i64..=3).prop_map(|(rd, k)| ToyOp::Jal { rd, offset: k * 4 }),
    ]
}

fn initial_state() -> impl Strategy<Value = ToyState> {
    (
        proptest::collection::vec(0u64..4, 5),
        proptest::collection::vec(0u64..4, 4),
    )
        .prop_map(|(regs, words)| {
            let mut state = ToyState::default();
            for (i, v) in regs.into_iter().enumerate() {
                state.regs[i + 1] = v;
            }
            for (i, v) in words.into_iter().enumerate() {
                state.store(i as u64 * 8, v);
            }
            state
        })
}

fn run_pipelined(program: &[ToyOp], init: &ToyState) -> TestContext {
    let mut tc = TestContext::new(program.to_vec());
    tc.pipeline.datapath_mut().state = init.clone();
    // Every instruction runs at most once; worst case is two stalls and a flush each.
    let _ = tc.run_to_completion(program.len() * 4 + 8);
    tc
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn pipeline_matches_sequential_execution(
        program in proptest::collection::vec(op(), 1..24),
        init in initial_state(),
    ) {
        let expected = run_sequential(&program, init.clone(), 1_000);
        let tc = run_pipelined(&program, &init);
        prop_assert_eq!(&tc.core().state, &expected);
    }

    #[test]
    fn cycle_accounting_is_consistent(
        program in proptest::collection::vec(op(), 1..24),
        init in initial_state(),
    ) {
        let tc = run_pipelined(&program, &init);
        let stats = tc.stats();
        prop_assert_eq!(stats.cycles, tc.pipeline.cycle());
        prop_assert!(stats.instructions_retired <= program.len() as u64);
        // The last retirement is at least four cycles after its fetch.
        if stats.instructions_retired > 0 {
            prop_assert!(stats.cycles >= stats.instructions_retired + 4);
        }
        prop_assert_eq!(stats.bubbles_inserted, stats.stall_cycles());
    }
}

#[test]
fn dependent_chain_through_memory() {
    let program = vec![
        ToyOp::Addi { rd: 1, rs1: 0, imm: 8 },
        ToyOp::Store { rs1: 1, rs2: 1, imm: 0 },
        ToyOp::Load { rd: 2, rs1: 1, imm: 0 },
        ToyOp::Load { rd: 3, rs1: 2, imm: 0 },
        ToyOp::Add { rd: 4, rs1: 3, rs2: 2 },
        ToyOp::Beq { rs1: 4, rs2: 0, offset: 8 },
        ToyOp::Store { rs1: 0, rs2: 4, imm: 16 },
        ToyOp::Nop,
    ];
    let expected = run_sequential(&program, ToyState::default(), 100);
    let tc = run_pipelined(&program, &ToyState::default());
    assert_eq!(tc.core().state, expected);
    assert_eq!(tc.mem(16), 16);
}
