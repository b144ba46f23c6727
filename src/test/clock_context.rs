use crate::clock::{Clock, ClockContext, ClockOverride, SystemWallClock, VirtualClock};
use crate::sim::{SimDuration, SimTime};
use std::rc::Rc;

// 2020-01-01T00:00:00Z
const SOME_REAL_WALL_TIME: SimTime = SimTime(1_577_836_800 * 1_000_000_000);

#[test]
fn default_context_reads_real_clocks() {
    let ctx = ClockContext::new();
    assert!(!ctx.is_overridden());

    let a = ctx.steady_now();
    let b = ctx.steady_now();
    assert!(b >= a);
    assert!(ctx.wall_now() > SOME_REAL_WALL_TIME);
}

#[test]
fn custom_clocks_redirect_reads_and_clear_restores() {
    let ctx = ClockContext::new();
    let steady = Rc::new(VirtualClock::steady(SimTime(5)));
    let wall = Rc::new(VirtualClock::wall(SimTime(7)));

    ctx.set_custom_clocks(steady.clone(), wall.clone());
    assert!(ctx.is_overridden());
    assert_eq!(ctx.steady_now(), SimTime(5));
    assert_eq!(ctx.wall_now(), SimTime(7));

    steady.advance(SimDuration(10));
    assert_eq!(ctx.steady_now(), SimTime(15));

    ctx.clear_custom_clocks();
    assert!(!ctx.is_overridden());
    assert!(ctx.wall_now() > SOME_REAL_WALL_TIME);
}

#[test]
fn clear_is_idempotent_and_install_then_clear_leaves_real_time() {
    let ctx = ClockContext::new();
    ctx.clear_custom_clocks();

    ctx.set_custom_clocks(
        Rc::new(VirtualClock::steady(SimTime::ZERO)),
        Rc::new(VirtualClock::wall(SimTime::ZERO)),
    );
    ctx.clear_custom_clocks();
    ctx.clear_custom_clocks();

    assert!(!ctx.is_overridden());
    let real = SystemWallClock.now();
    assert!(ctx.wall_now() >= real);
}

#[test]
fn clones_share_installation_state() {
    let ctx = ClockContext::new();
    let seen_by_component = ctx.clone();

    let guard = ClockOverride::install(&ctx);
    assert!(seen_by_component.is_overridden());
    assert_eq!(seen_by_component.steady_now(), guard.steady().now());
    drop(guard);

    assert!(!seen_by_component.is_overridden());
}

#[test]
fn override_reverts_on_unwind() {
    let ctx = ClockContext::new();
    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = ClockOverride::install(&ctx);
        panic!("test body failed");
    }));
    assert!(res.is_err());
    assert!(!ctx.is_overridden());
}

#[test]
#[should_panic(expected = "already installed")]
fn nested_override_is_rejected() {
    let ctx = ClockContext::new();
    let _outer = ClockOverride::install(&ctx);
    let _inner = ClockOverride::install(&ctx);
}

#[test]
#[should_panic(expected = "steady slot")]
fn wall_clock_in_steady_slot_is_rejected() {
    let ctx = ClockContext::new();
    ctx.set_custom_clocks(
        Rc::new(VirtualClock::wall(SimTime::ZERO)),
        Rc::new(VirtualClock::wall(SimTime::ZERO)),
    );
}
