//! Completion Merger Tests.
//!
//! Verifies that write-back reports set the completed flag and result of live slots, that
//! exceptions stick, and that malformed or stale reports never corrupt state.

use pretty_assertions::assert_eq;
use rvrob_core::common::{ProtocolViolation, Trap};
use rvrob_core::core::pipeline::rob::RobTag;
use rvrob_core::core::pipeline::signals::FuTag;

use crate::common::builder::Cycle;
use crate::common::harness::TestContext;

#[test]
fn test_completion_sets_result_and_flag() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(4, FuTag::Alu);
    assert!(!ctx.rob().slot(tag).unwrap().record.completed);

    let out = ctx.complete(tag, 0xDEAD);
    assert!(out.violations.is_empty());

    let record = &ctx.rob().slot(tag).unwrap().record;
    assert!(record.completed);
    assert_eq!(record.result, 0xDEAD);
    assert_eq!(record.exception, None);
}

#[test]
fn test_merge_across_ports() {
    let mut ctx = TestContext::new();
    let a = ctx.dispatch(1, FuTag::Alu);
    let b = ctx.dispatch(2, FuTag::Mul);
    let c = ctx.dispatch(3, FuTag::Lsu);

    let _ = ctx.step(
        Cycle::new()
            .complete(c.0, 30)
            .idle_port()
            .complete(a.0, 10),
    );

    let rob = ctx.rob();
    assert_eq!(rob.slot(a).unwrap().record.result, 10);
    assert!(rob.slot(a).unwrap().record.completed);
    assert!(!rob.slot(b).unwrap().record.completed);
    assert_eq!(rob.slot(c).unwrap().record.result, 30);
    assert_eq!(rob.stats.completions, 2);
}

#[test]
fn test_out_of_order_completion_holds_head() {
    let mut ctx = TestContext::new();
    let older = ctx.dispatch(1, FuTag::Div);
    let younger = ctx.dispatch(2, FuTag::Alu);
    let _ = ctx.complete(younger, 5);

    let out = ctx.idle();
    assert_eq!(out.commit.record.tag, older);
    assert!(!out.commit.completed);

    let _ = ctx.complete(older, 7);
    let out = ctx.idle();
    assert!(out.commit.completed);
    assert_eq!(out.commit.record.result, 7);
}

#[test]
fn test_fault_marks_complete_with_exception() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(9, FuTag::Lsu);
    let _ = ctx.step(Cycle::new().fault(tag.0, Trap::StoreAccessFault(0x8000_1000)));

    let out = ctx.idle();
    assert!(out.commit.completed);
    assert_eq!(
        out.commit.record.exception,
        Some(Trap::StoreAccessFault(0x8000_1000))
    );
}

#[test]
fn test_clean_report_does_not_clear_exception() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(9, FuTag::Lsu);
    let _ = ctx.step(Cycle::new().fault(tag.0, Trap::LoadPageFault(0x40)));
    let _ = ctx.complete(tag, 11);

    let record = &ctx.rob().slot(tag).unwrap().record;
    assert_eq!(record.exception, Some(Trap::LoadPageFault(0x40)));
    assert_eq!(record.result, 11);
}

#[test]
fn test_report_after_flush_is_stale() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(6, FuTag::Mul);
    let _ = ctx.step(Cycle::new().flush());

    let out = ctx.complete(tag, 99);
    assert!(out.violations.is_empty());
    assert!(!ctx.rob().slot(tag).unwrap().record.completed);
    assert!(ctx.rob().is_empty());
    assert_eq!(ctx.rob().stats.stale_completions, 1);
}

#[test]
fn test_report_in_flush_cycle_is_discarded() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(6, FuTag::Alu);
    let _ = ctx.step(Cycle::new().complete(tag.0, 3).flush());

    let slot = ctx.rob().slot(tag).unwrap();
    assert!(!slot.occupied);
    assert!(!slot.record.completed);
}

#[test]
fn test_tag_out_of_range_rejected() {
    let mut ctx = TestContext::with_entries(4);
    let _ = ctx.dispatch(2, FuTag::Alu);
    let out = ctx.step(Cycle::new().complete(7, 1));
    assert_eq!(
        out.violations,
        vec![ProtocolViolation::TagOutOfRange {
            tag: RobTag(7),
            port: 0,
            capacity: 4,
        }]
    );
    assert_eq!(ctx.rob().stats.completions, 0);
    assert_eq!(ctx.rob().stats.violations, 1);
}

#[test]
fn test_excess_ports_truncated() {
    let mut ctx = TestContext::new();
    let tags: Vec<RobTag> = (1..=5).map(|rd| ctx.dispatch(rd, FuTag::Alu)).collect();

    let cycle = tags
        .iter()
        .fold(Cycle::new(), |cycle, tag| cycle.complete(tag.0, tag.0 as u64 + 100));
    let out = ctx.step(cycle);

    assert_eq!(
        out.violations,
        vec![ProtocolViolation::ExcessWritebackPorts {
            supplied: 5,
            configured: 4,
        }]
    );
    for tag in &tags[..4] {
        assert!(ctx.rob().slot(*tag).unwrap().record.completed);
    }
    assert!(!ctx.rob().slot(tags[4]).unwrap().record.completed);
}

#[test]
fn test_duplicate_report_keeps_first() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(12, FuTag::Alu);
    let out = ctx.step(Cycle::new().complete(tag.0, 1).idle_port().complete(tag.0, 2));
    assert_eq!(
        out.violations,
        vec![ProtocolViolation::DuplicateCompletion {
            tag,
            first_port: 0,
            port: 2,
        }]
    );
    assert_eq!(ctx.rob().slot(tag).unwrap().record.result, 1);
}
