//! Control Hazard Tests.
//!
//! Verifies that a taken branch or jump in Decode flushes only the IF/ID
//! register, and that data stalls take precedence over a taken branch.

use pretty_assertions::assert_eq;
use rvpipe_core::common::RegIdx;
use rvpipe_core::core::pipeline::hazards::{classify, detect_hazards};
use rvpipe_core::core::pipeline::signals::{
    DecodeProbe, HazardKind, HazardSignals, StageProbe, StallCause,
};

use crate::common::builder::snapshot::{jump_reads, reads};

#[test]
fn taken_branch_flushes_if_id_only() {
    let none = StageProbe::default();
    let signals = detect_hazards(&jump_reads(1, 2, true), &none, &none);
    assert_eq!(
        signals,
        HazardSignals {
            if_flush: true,
            ..HazardSignals::CLEAR
        }
    );
    assert!(!signals.is_stall());
}

#[test]
fn taken_jal_flushes_without_operands() {
    // JAL does not read registers; its target is known in Decode.
    let id = DecodeProbe {
        branch_taken: true,
        ..DecodeProbe::default()
    };
    let none = StageProbe::default();
    assert_eq!(classify(&id, &none, &none), HazardKind::Control);
}

#[test]
fn not_taken_branch_is_clear() {
    let none = StageProbe::default();
    assert_eq!(
        detect_hazards(&jump_reads(1, 2, false), &none, &none),
        HazardSignals::CLEAR
    );
}

#[test]
fn taken_branch_with_unrelated_producers_flushes() {
    let id = jump_reads(1, 2, true);
    let ex = StageProbe::load(RegIdx::new(7));
    let mem = StageProbe::load(RegIdx::new(8));
    assert_eq!(classify(&id, &ex, &mem), HazardKind::Control);
}

// ══════════════════════════════════════════════════════════
// Stall dominance
// ══════════════════════════════════════════════════════════

#[test]
fn stall_one_cycle_dominates_taken_branch() {
    // beq x5, x0 resolved "taken" on a stale x5 while addi x5 is in Execute.
    let id = jump_reads(5, 0, true);
    let kind = classify(&id, &StageProbe::non_load(RegIdx::new(5)), &StageProbe::default());
    assert_eq!(kind, HazardKind::DataStall(StallCause::OneCycle));

    let signals = HazardSignals::from(kind);
    assert!(signals.is_stall());
    assert!(!signals.if_flush);
}

#[test]
fn stall_two_cycle_dominates_taken_branch() {
    let id = jump_reads(5, 0, true);
    let kind = classify(&id, &StageProbe::default(), &StageProbe::load(RegIdx::new(5)));
    assert_eq!(kind, HazardKind::DataStall(StallCause::TwoCycle));
}

#[test]
fn load_use_on_non_jump_also_suppresses_branch_taken() {
    // A non-jump never reports branch_taken in practice, but the priority holds.
    let id = DecodeProbe {
        branch_taken: true,
        ..reads(5, 0)
    };
    let kind = classify(&id, &StageProbe::load(RegIdx::new(5)), &StageProbe::default());
    assert_eq!(kind, HazardKind::DataStall(StallCause::OneCycle));
}
