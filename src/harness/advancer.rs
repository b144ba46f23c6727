//! 时间推进器
//!
//! 按固定步长同步推进稳定时钟和墙上时钟，每走一步就把控制权交给事件循环，
//! 让在这一步内到期的回调按到期顺序执行。

use super::event_loop::EventLoop;
use crate::clock::VirtualClock;
use crate::sim::SimDuration;
use std::rc::Rc;
use tracing::{debug, trace};

#[track_caller]
fn check_tick(tick: SimDuration) {
    assert!(
        tick.is_positive(),
        "tick must be a positive duration, got {:?}",
        tick
    );
}

/// 一次推进调用内的步进状态：每步 `min(tick, remaining)`，`remaining` 归零即结束。
///
/// 最后一步可能短于 `tick`，保证总量恰好落在 `total` 上。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Steps {
    tick: SimDuration,
    remaining: SimDuration,
}

impl Steps {
    #[track_caller]
    pub fn new(tick: SimDuration, total: SimDuration) -> Self {
        check_tick(tick);
        assert!(
            !total.is_negative(),
            "total must not be negative, got {:?}",
            total
        );
        Self {
            tick,
            remaining: total,
        }
    }

    pub fn remaining(&self) -> SimDuration {
        self.remaining
    }
}

impl Iterator for Steps {
    type Item = SimDuration;

    fn next(&mut self) -> Option<SimDuration> {
        if !self.remaining.is_positive() {
            return None;
        }
        let step = self.tick.min(self.remaining);
        self.remaining -= step;
        Some(step)
    }
}

/// 时间推进器：持有两只虚拟时钟，不持有事件循环。
#[derive(Debug, Clone)]
pub struct TimeAdvancer {
    steady: Rc<VirtualClock>,
    wall: Rc<VirtualClock>,
}

impl TimeAdvancer {
    pub fn new(steady: Rc<VirtualClock>, wall: Rc<VirtualClock>) -> Self {
        Self { steady, wall }
    }

    pub fn steady(&self) -> &Rc<VirtualClock> {
        &self.steady
    }

    pub fn wall(&self) -> &Rc<VirtualClock> {
        &self.wall
    }

    /// 以 `tick` 为步长推进 `n_ticks` 次，等价于 `advance_for(lp, tick, tick * n_ticks)`。
    #[track_caller]
    pub fn advance<L>(&self, lp: &mut L, tick: SimDuration, n_ticks: u64) -> Result<(), L::Error>
    where
        L: EventLoop + ?Sized,
    {
        check_tick(tick);
        let total = tick
            .checked_mul(n_ticks)
            .unwrap_or_else(|| panic!("{:?} x {} overflows the clock range", tick, n_ticks));
        self.advance_for(lp, tick, total)
    }

    /// 以 `tick` 为步长推进共 `total`。
    ///
    /// 每一步之后 pump 一次事件循环。回调返回的错误会立即原样返回，
    /// 之后的步不再执行，时钟停在已完成的步上。
    /// `tick <= 0`、`total < 0`，或任一时钟加上 `total` 超出范围，都会在修改任何时钟之前 panic。
    #[track_caller]
    pub fn advance_for<L>(
        &self,
        lp: &mut L,
        tick: SimDuration,
        total: SimDuration,
    ) -> Result<(), L::Error>
    where
        L: EventLoop + ?Sized,
    {
        let steps = Steps::new(tick, total);
        for clock in [&self.steady, &self.wall] {
            assert!(
                clock.now().checked_add(total).is_some(),
                "advancing {:?} by {:?} overflows the clock range",
                clock,
                total
            );
        }
        debug!(?tick, ?total, start = ?self.steady.now(), "开始推进时钟");

        let mut pumps = 0_u64;
        for step in steps {
            self.steady.advance(step);
            self.wall.advance(step);
            pumps += 1;
            trace!(?step, steady = ?self.steady.now(), wall = ?self.wall.now(), "时钟前进一步");

            let ran = pump(lp)?;
            trace!(ran, "pump 完成");
        }

        debug!(pumps, end = ?self.steady.now(), "推进完成");
        Ok(())
    }
}

fn pump<L: EventLoop + ?Sized>(lp: &mut L) -> Result<usize, L::Error> {
    if lp.is_stopped() {
        debug!("事件循环已停止，重置后继续");
        lp.reset_for_reuse();
    }
    lp.run_ready_work()
}
