//! 事件循环错误

use super::handler::HandlerError;
use super::scheduled_event::TimerId;
use super::time::SimTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopError {
    /// 回调返回了错误；之后的回调保持排队，不会在本轮执行。
    #[error("handler {timer:?} due at {at:?} failed: {source}")]
    Handler {
        timer: TimerId,
        at: SimTime,
        #[source]
        source: HandlerError,
    },
}
