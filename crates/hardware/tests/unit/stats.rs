//! Statistics Tests.

use pretty_assertions::assert_eq;
use rvrob_core::core::pipeline::rob::RobTag;
use rvrob_core::core::pipeline::signals::FuTag;
use rvrob_core::stats::STATS_SECTIONS;

use crate::common::builder::Cycle;
use crate::common::harness::TestContext;

#[test]
fn test_counters_after_scripted_run() {
    let mut ctx = TestContext::with_entries(4);
    let a = ctx.dispatch(1, FuTag::Alu);
    let b = ctx.dispatch(2, FuTag::Alu);
    let _ = ctx.dispatch(3, FuTag::Alu);
    let _ = ctx.step(Cycle::new().dispatch_rd(4, FuTag::Alu));
    let _ = ctx.step(Cycle::new().dispatch_rd(4, FuTag::Alu).branch_pending());
    let _ = ctx.step(Cycle::new().complete(a.0, 1).complete(b.0, 2).read(1, 2));
    let _ = ctx.commit();
    let _ = ctx.commit();
    let _ = ctx.step(Cycle::new().flush());
    let _ = ctx.complete(RobTag(2), 3);
    let _ = ctx.commit();

    let stats = &ctx.rob().stats;
    assert_eq!(stats.cycles, 11);
    assert_eq!(stats.dispatched, 3);
    assert_eq!(stats.stalls_full, 1);
    assert_eq!(stats.stalls_branch, 1);
    assert_eq!(stats.operands_forwarded, 2);
    assert_eq!(stats.completions, 2);
    assert_eq!(stats.stale_completions, 1);
    assert_eq!(stats.committed, 2);
    assert_eq!(stats.flushes, 1);
    assert_eq!(stats.violations, 1);
    assert_eq!(stats.peak_occupancy, 3);
    assert_eq!(stats.occupancy_sum, 18);
    assert!((stats.ipc() - 2.0 / 11.0).abs() < 1e-9);
    assert!((stats.average_occupancy() - 18.0 / 11.0).abs() < 1e-9);
}

#[test]
fn test_section_names() {
    assert_eq!(STATS_SECTIONS, &["summary", "occupancy", "hazards"]);
}

#[test]
fn test_print_selected_sections() {
    let mut ctx = TestContext::new();
    let _ = ctx.dispatch(1, FuTag::Alu);
    ctx.rob().stats.print_sections(&["hazards".to_string()]);
    ctx.rob().stats.print();
}
