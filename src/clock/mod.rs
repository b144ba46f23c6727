//! 时钟模块
//!
//! 提供稳定时钟（steady）与墙上时钟（wall）的抽象、真实实现、
//! 可由测试推进的虚拟时钟，以及把时间读取重定向到虚拟时钟的上下文。

mod context;
mod source;
mod virtual_clock;

pub use context::{ClockContext, ClockOverride};
pub use source::{Clock, ClockKind, SystemSteadyClock, SystemWallClock};
pub use virtual_clock::{DEFAULT_STEADY_START, DEFAULT_WALL_START, VirtualClock};
