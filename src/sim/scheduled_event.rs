//! 调度中的定时器
//!
//! 定义排队回调的结构及其优先级比较。

use super::handler::Handler;
use super::time::SimTime;
use std::cmp::Ordering;

/// 定时器标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// 排队中的回调，包含到期时间、序列号和回调对象。
pub struct ScheduledTimer {
    pub(crate) at: SimTime,
    pub(crate) id: TimerId,
    pub(crate) handler: Box<dyn Handler>,
}

impl ScheduledTimer {
    fn key(&self) -> (SimTime, TimerId) {
        (self.at, self.id)
    }
}

// 堆顶应是最早到期的条目；同一时刻 id 小（先提交）的先出。
impl Ord for ScheduledTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for ScheduledTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledTimer {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledTimer {}
