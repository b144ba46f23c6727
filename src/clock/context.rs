//! 时钟上下文
//!
//! 被测组件通过注入的 [`ClockContext`] 读取当前时间，而不是直接访问系统时钟。
//! 默认读真实时钟；测试可以把它重定向到一对虚拟时钟。

use super::source::{Clock, ClockKind, SystemSteadyClock, SystemWallClock};
use super::virtual_clock::{DEFAULT_STEADY_START, DEFAULT_WALL_START, VirtualClock};
use crate::sim::SimTime;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

struct CustomClocks {
    steady: Rc<dyn Clock>,
    wall: Rc<dyn Clock>,
}

struct Inner {
    real_steady: SystemSteadyClock,
    real_wall: SystemWallClock,
    custom: Option<CustomClocks>,
}

/// 可注入的时间读取入口。克隆只复制句柄，所有克隆看到同一份安装状态。
#[derive(Clone)]
pub struct ClockContext {
    inner: Rc<RefCell<Inner>>,
}

impl Default for ClockContext {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                real_steady: SystemSteadyClock::default(),
                real_wall: SystemWallClock,
                custom: None,
            })),
        }
    }
}

impl fmt::Debug for ClockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockContext")
            .field("overridden", &self.is_overridden())
            .finish()
    }
}

impl ClockContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前稳定时钟读数
    pub fn steady_now(&self) -> SimTime {
        let inner = self.inner.borrow();
        match &inner.custom {
            Some(c) => c.steady.now(),
            None => inner.real_steady.now(),
        }
    }

    /// 当前墙上时钟读数
    pub fn wall_now(&self) -> SimTime {
        let inner = self.inner.borrow();
        match &inner.custom {
            Some(c) => c.wall.now(),
            None => inner.real_wall.now(),
        }
    }

    /// 把所有时间读取重定向到给定的两个时钟
    pub fn set_custom_clocks(&self, steady: Rc<dyn Clock>, wall: Rc<dyn Clock>) {
        assert_eq!(steady.kind(), ClockKind::Steady, "steady slot needs a steady clock");
        assert_eq!(wall.kind(), ClockKind::Wall, "wall slot needs a wall clock");
        debug!("安装自定义时钟");
        self.inner.borrow_mut().custom = Some(CustomClocks { steady, wall });
    }

    /// 恢复真实时钟。可重复调用。
    pub fn clear_custom_clocks(&self) {
        if self.inner.borrow_mut().custom.take().is_some() {
            debug!("恢复真实时钟");
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.inner.borrow().custom.is_some()
    }
}

/// 作用域守卫：构造时安装一对新的虚拟时钟，析构时（包括 panic 展开）恢复真实时钟。
pub struct ClockOverride {
    ctx: ClockContext,
    steady: Rc<VirtualClock>,
    wall: Rc<VirtualClock>,
}

impl ClockOverride {
    /// 以默认起点安装
    pub fn install(ctx: &ClockContext) -> Self {
        Self::install_at(ctx, DEFAULT_STEADY_START, DEFAULT_WALL_START)
    }

    /// 以指定起点安装。同一上下文上不允许嵌套安装。
    pub fn install_at(ctx: &ClockContext, steady_start: SimTime, wall_start: SimTime) -> Self {
        assert!(
            !ctx.is_overridden(),
            "custom clocks are already installed on this context"
        );
        let steady = Rc::new(VirtualClock::steady(steady_start));
        let wall = Rc::new(VirtualClock::wall(wall_start));
        ctx.set_custom_clocks(steady.clone(), wall.clone());
        Self {
            ctx: ctx.clone(),
            steady,
            wall,
        }
    }

    pub fn steady(&self) -> &Rc<VirtualClock> {
        &self.steady
    }

    pub fn wall(&self) -> &Rc<VirtualClock> {
        &self.wall
    }
}

impl Drop for ClockOverride {
    fn drop(&mut self) {
        self.ctx.clear_custom_clocks();
    }
}
