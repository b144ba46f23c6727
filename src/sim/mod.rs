//! 仿真核心模块
//!
//! 此模块包含仿真时间类型，以及单线程事件循环及其回调、定时器和错误类型。

// 子模块声明
mod error;
mod handler;
mod scheduled_event;
mod time;
mod timer_loop;

// 重新导出公共接口
pub use error::LoopError;
pub use handler::{Handler, HandlerError, HandlerResult};
pub use scheduled_event::TimerId;
pub use time::{SimDuration, SimTime};
pub use timer_loop::TimerLoop;
