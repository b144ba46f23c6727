//! 时钟源
//!
//! 定义时钟 trait 及基于系统时间的真实实现。

use crate::sim::SimTime;
use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// 时钟种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockKind {
    /// 单调时钟，用于间隔与超时
    Steady,
    /// 墙上（系统）时钟，用于时间戳
    Wall,
}

/// 时钟源：被测代码只通过它读取当前时间。
pub trait Clock {
    fn now(&self) -> SimTime;
    fn kind(&self) -> ClockKind;
}

// 进程内所有 SystemSteadyClock 共用同一个锚点，读数可以互相比较。
static STEADY_ANCHOR: OnceLock<Instant> = OnceLock::new();

/// 真实单调时钟：自进程内首次使用起经过的纳秒数。
#[derive(Debug, Clone, Copy)]
pub struct SystemSteadyClock {
    anchor: Instant,
}

impl Default for SystemSteadyClock {
    fn default() -> Self {
        Self {
            anchor: *STEADY_ANCHOR.get_or_init(Instant::now),
        }
    }
}

impl Clock for SystemSteadyClock {
    fn now(&self) -> SimTime {
        let ns = self.anchor.elapsed().as_nanos();
        SimTime(i64::try_from(ns).unwrap_or(i64::MAX))
    }

    fn kind(&self) -> ClockKind {
        ClockKind::Steady
    }
}

/// 真实墙上时钟：自 UNIX 纪元起的纳秒数。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl Clock for SystemWallClock {
    fn now(&self) -> SimTime {
        let to_ns = |d: std::time::Duration| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX);
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => SimTime(to_ns(d)),
            // 系统时间早于纪元
            Err(e) => SimTime(-to_ns(e.duration())),
        }
    }

    fn kind(&self) -> ClockKind {
        ClockKind::Wall
    }
}
