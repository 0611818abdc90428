//! Operand Forwarding Tests.
//!
//! A source operand resolves to the stored result of its in-flight producer, or to a value
//! being written back in the same cycle, or to nothing (read the register file).

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvrob_core::common::Trap;
use rvrob_core::core::pipeline::latches::{Operand, OperandSource};
use rvrob_core::core::pipeline::rob::RobTag;
use rvrob_core::core::pipeline::signals::FuTag;

use crate::common::builder::Cycle;
use crate::common::harness::TestContext;

#[test]
fn test_no_producer_reads_register_file() {
    let mut ctx = TestContext::new();
    let _ = ctx.dispatch(4, FuTag::Alu);
    let out = ctx.step(Cycle::new().read(7, 8));
    assert_eq!(out.rs1, Operand::default());
    assert_eq!(out.rs1.source, OperandSource::RegFile);
    assert_eq!(out.rs2, Operand::default());
}

#[test]
fn test_pending_producer_not_valid() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(4, FuTag::Mul);
    let out = ctx.step(Cycle::new().read(4, 0));
    assert!(!out.rs1.valid);
    assert_eq!(out.rs1.source, OperandSource::Entry { tag });
}

#[test]
fn test_same_cycle_bypass() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(5, FuTag::Alu);

    let out = ctx.step(Cycle::new().complete(tag.0, 42).read(5, 5));
    assert_eq!(out.clobber.get(5), FuTag::Alu);
    assert_eq!((out.rs1.value, out.rs1.valid), (42, true));
    assert_eq!(out.rs1.source, OperandSource::Bypass { port: 0 });
    assert_eq!(out.rs2, out.rs1);
    assert_eq!(ctx.rob().stats.operands_forwarded, 2);
}

#[test]
fn test_stored_result_after_writeback() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(5, FuTag::Alu);
    let _ = ctx.complete(tag, 42);

    let out = ctx.step(Cycle::new().read(0, 5));
    assert_eq!((out.rs2.value, out.rs2.valid), (42, true));
    assert_eq!(out.rs2.source, OperandSource::Entry { tag });
}

#[test]
fn test_faulting_writeback_not_forwarded() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(8, FuTag::Lsu);
    let out = ctx.step(
        Cycle::new()
            .fault(tag.0, Trap::LoadAccessFault(0x10))
            .read(8, 0),
    );
    assert!(!out.rs1.valid);
    assert_eq!(out.rs1.source, OperandSource::Entry { tag });
}

#[test]
fn test_bypass_from_later_port() {
    let mut ctx = TestContext::new();
    let a = ctx.dispatch(1, FuTag::Alu);
    let b = ctx.dispatch(2, FuTag::Mul);
    let out = ctx.step(
        Cycle::new()
            .complete(a.0, 11)
            .idle_port()
            .complete(b.0, 22)
            .read(2, 1),
    );
    assert_eq!(out.rs1.source, OperandSource::Bypass { port: 2 });
    assert_eq!(out.rs1.value, 22);
    assert_eq!(out.rs2.source, OperandSource::Bypass { port: 0 });
    assert_eq!(out.rs2.value, 11);
}

#[test]
fn test_outputs_precede_same_cycle_allocation() {
    let mut ctx = TestContext::new();
    let out = ctx.step(Cycle::new().dispatch_rd(6, FuTag::Alu).read(6, 0));
    assert_eq!(out.allocated, Some(RobTag(0)));
    assert_eq!(out.clobber.get(6), FuTag::None);
    assert_eq!(out.rs1, Operand::default());
    assert!(!out.commit.occupied);
}

#[test]
fn test_stale_report_not_forwarded() {
    let mut ctx = TestContext::new();
    let tag = ctx.dispatch(6, FuTag::Alu);
    let _ = ctx.step(Cycle::new().flush());
    let out = ctx.step(Cycle::new().complete(tag.0, 13).read(6, 0));
    assert_eq!(out.rs1, Operand::default());
}

#[rstest]
#[case::idle(None)]
#[case::pending(Some(None))]
#[case::forwarded(Some(Some(77)))]
fn test_x0_always_zero_and_invalid(#[case] producer: Option<Option<u64>>) {
    let mut ctx = TestContext::new();
    let mut cycle = Cycle::new().read(0, 0);
    if let Some(result) = producer {
        let tag = ctx.dispatch(0, FuTag::Alu);
        if let Some(value) = result {
            cycle = cycle.complete(tag.0, value);
        }
    }
    let out = ctx.step(cycle);
    assert_eq!((out.rs1.value, out.rs1.valid), (0, false));
    assert_eq!((out.rs2.value, out.rs2.valid), (0, false));
}
