//! 回调 trait
//!
//! 定义事件循环中可执行的回调接口。

use super::timer_loop::TimerLoop;

/// 回调失败时携带的错误
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

/// 回调：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
///
/// 回调拿到 `&mut TimerLoop`，可以继续投递或调度新的回调、取消定时器、或停止循环。
pub trait Handler: 'static {
    fn fire(self: Box<Self>, lp: &mut TimerLoop) -> HandlerResult;
}

impl<F> Handler for F
where
    F: FnOnce(&mut TimerLoop) -> HandlerResult + 'static,
{
    fn fire(self: Box<Self>, lp: &mut TimerLoop) -> HandlerResult {
        (*self)(lp)
    }
}
