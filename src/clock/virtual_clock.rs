//! 虚拟时钟
//!
//! 只能通过显式调用 `advance` 前进的时钟。单线程使用，通过 `Rc` 共享：
//! 推进方持有它并修改，被测代码经由 [`ClockContext`](super::ClockContext) 只读访问。

use super::source::{Clock, ClockKind};
use crate::sim::{SimDuration, SimTime};
use std::cell::Cell;
use tracing::trace;

/// 单调稳定时钟的默认起点
pub const DEFAULT_STEADY_START: SimTime = SimTime(0);
/// 墙上时钟的默认起点：2014-11-11T05:35:32Z
pub const DEFAULT_WALL_START: SimTime = SimTime(1_415_684_132 * 1_000_000_000);

/// 测试控制的虚拟时钟
#[derive(Debug)]
pub struct VirtualClock {
    kind: ClockKind,
    current: Cell<SimTime>,
}

impl VirtualClock {
    pub fn new(kind: ClockKind, start: SimTime) -> Self {
        Self {
            kind,
            current: Cell::new(start),
        }
    }

    pub fn steady(start: SimTime) -> Self {
        Self::new(ClockKind::Steady, start)
    }

    pub fn wall(start: SimTime) -> Self {
        Self::new(ClockKind::Wall, start)
    }

    /// 当前虚拟时间
    pub fn now(&self) -> SimTime {
        self.current.get()
    }

    /// 把时钟向前推进 `delta`。
    ///
    /// `delta` 必须为正；零或负值说明测试本身写错了，直接 panic。
    /// 时钟本身不触发任何定时器，到期的回调由事件循环在下一次 pump 时执行。
    #[track_caller]
    pub fn advance(&self, delta: SimDuration) {
        assert!(
            delta.is_positive(),
            "virtual {:?} clock must advance by a positive duration, got {:?}",
            self.kind,
            delta
        );
        let before = self.current.get();
        let after = before.checked_add(delta).unwrap_or_else(|| {
            panic!(
                "virtual {:?} clock overflows advancing {:?} by {:?}",
                self.kind, before, delta
            )
        });
        self.current.set(after);
        trace!(kind = ?self.kind, from = ?before, to = ?self.current.get(), "虚拟时钟前进");
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> SimTime {
        VirtualClock::now(self)
    }

    fn kind(&self) -> ClockKind {
        self.kind
    }
}
