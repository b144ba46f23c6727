//! 测试上下文
//!
//! 由两个独立的部件组合而成，各自负责自己的建立与拆除：
//! - [`IoFixture`]：每个测试一个全新的事件循环
//! - [`ClockOverride`]：安装虚拟时钟，析构时恢复真实时钟

use super::advancer::TimeAdvancer;
use crate::clock::{ClockContext, ClockOverride, VirtualClock};
use crate::config::HarnessConfig;
use crate::sim::{LoopError, SimDuration, TimerLoop};
use std::rc::Rc;

/// 每个测试独立的事件循环
pub struct IoFixture {
    lp: TimerLoop,
}

impl IoFixture {
    pub fn new(clocks: &ClockContext) -> Self {
        Self {
            lp: TimerLoop::new(clocks.clone()),
        }
    }

    pub fn event_loop(&mut self) -> &mut TimerLoop {
        &mut self.lp
    }
}

/// 覆盖了稳定时钟与墙上时钟的测试上下文
pub struct TimeTestContext {
    config: HarnessConfig,
    clocks: ClockContext,
    // 字段按声明顺序析构：先拆事件循环，再恢复真实时钟。
    io: IoFixture,
    time: ClockOverride,
}

impl Default for TimeTestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeTestContext {
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        let clocks = ClockContext::new();
        let io = IoFixture::new(&clocks);
        let time = ClockOverride::install_at(&clocks, config.steady_start, config.wall_start);
        Self {
            config,
            clocks,
            io,
            time,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// 注入给被测组件的时钟上下文
    pub fn clocks(&self) -> &ClockContext {
        &self.clocks
    }

    pub fn event_loop(&mut self) -> &mut TimerLoop {
        self.io.event_loop()
    }

    pub fn steady_clock(&self) -> &Rc<VirtualClock> {
        self.time.steady()
    }

    pub fn wall_clock(&self) -> &Rc<VirtualClock> {
        self.time.wall()
    }

    pub fn advancer(&self) -> TimeAdvancer {
        TimeAdvancer::new(self.time.steady().clone(), self.time.wall().clone())
    }

    /// 以 `tick` 为步长推进 `n_ticks` 次，每步之后 pump 事件循环
    #[track_caller]
    pub fn advance_clocks(&mut self, tick: SimDuration, n_ticks: u64) -> Result<(), LoopError> {
        let advancer = self.advancer();
        advancer.advance(self.io.event_loop(), tick, n_ticks)
    }

    /// 以 `tick` 为步长推进共 `total`，最后一步可能更短
    #[track_caller]
    pub fn advance_clocks_for(
        &mut self,
        tick: SimDuration,
        total: SimDuration,
    ) -> Result<(), LoopError> {
        let advancer = self.advancer();
        advancer.advance_for(self.io.event_loop(), tick, total)
    }

    /// 以配置中的默认步长推进共 `total`
    #[track_caller]
    pub fn advance_by(&mut self, total: SimDuration) -> Result<(), LoopError> {
        let tick = self.config.default_tick;
        self.advance_clocks_for(tick, total)
    }
}
