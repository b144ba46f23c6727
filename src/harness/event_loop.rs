//! 事件循环接口
//!
//! 时间推进器只通过这里的三个操作驱动外部事件循环。

use crate::sim::{LoopError, TimerLoop};

/// 推进器需要的事件循环操作。
///
/// 每次 pump 的调用顺序固定：先 `is_stopped`，已停止则 `reset_for_reuse`，最后 `run_ready_work`。
pub trait EventLoop {
    type Error;

    fn is_stopped(&self) -> bool;
    fn reset_for_reuse(&mut self);
    /// 一轮非阻塞执行，返回执行的回调数
    fn run_ready_work(&mut self) -> Result<usize, Self::Error>;
}

impl EventLoop for TimerLoop {
    type Error = LoopError;

    fn is_stopped(&self) -> bool {
        TimerLoop::is_stopped(self)
    }

    fn reset_for_reuse(&mut self) {
        TimerLoop::reset_for_reuse(self)
    }

    fn run_ready_work(&mut self) -> Result<usize, LoopError> {
        TimerLoop::run_ready_work(self)
    }
}
